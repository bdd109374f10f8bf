//! Random forest regression
//!
//! A small bagged ensemble of CART regression trees, sized for a handful of
//! monthly rows. Trees consider every feature at each split, use the squared
//! error criterion and grow until a node is pure or holds a single sample.
//! All randomness comes from a seeded generator so training is reproducible.

/// SplitMix64 generator
#[derive(Debug, Clone)]
pub struct SeededRng {
    state: u64,
}

impl SeededRng {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform index in `0..bound`; `bound` must be non-zero
    pub fn below(&mut self, bound: usize) -> usize {
        (self.next_u64() % bound as u64) as usize
    }

    /// Fisher-Yates shuffle
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.below(i + 1);
            items.swap(i, j);
        }
    }
}

#[derive(Debug, Clone)]
enum Node {
    Leaf(f64),
    Split {
        feature: usize,
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

impl Node {
    fn predict(&self, features: &[f64]) -> f64 {
        match self {
            Node::Leaf(value) => *value,
            Node::Split {
                feature,
                threshold,
                left,
                right,
            } => {
                if features[*feature] <= *threshold {
                    left.predict(features)
                } else {
                    right.predict(features)
                }
            }
        }
    }
}

/// A single CART regression tree
#[derive(Debug, Clone)]
pub struct RegressionTree {
    root: Node,
}

impl RegressionTree {
    /// Fit a tree on the rows selected by `sample` (duplicates allowed)
    pub fn fit(rows: &[Vec<f64>], targets: &[f64], sample: &[usize]) -> Self {
        Self {
            root: build_node(rows, targets, sample),
        }
    }

    pub fn predict(&self, features: &[f64]) -> f64 {
        self.root.predict(features)
    }
}

struct BestSplit {
    feature: usize,
    threshold: f64,
    score: f64,
}

fn build_node(rows: &[Vec<f64>], targets: &[f64], sample: &[usize]) -> Node {
    let values: Vec<f64> = sample.iter().map(|&i| targets[i]).collect();
    let node_mean = mean(&values);

    if sample.len() <= 1 || values.iter().all(|v| *v == values[0]) {
        return Node::Leaf(node_mean);
    }

    let Some(best) = best_split(rows, targets, sample) else {
        // Identical feature vectors with differing targets
        return Node::Leaf(node_mean);
    };

    let (left, right): (Vec<usize>, Vec<usize>) = sample
        .iter()
        .copied()
        .partition(|&i| rows[i][best.feature] <= best.threshold);

    Node::Split {
        feature: best.feature,
        threshold: best.threshold,
        left: Box::new(build_node(rows, targets, &left)),
        right: Box::new(build_node(rows, targets, &right)),
    }
}

fn best_split(rows: &[Vec<f64>], targets: &[f64], sample: &[usize]) -> Option<BestSplit> {
    let n_features = rows.get(sample[0]).map_or(0, Vec::len);
    let mut best: Option<BestSplit> = None;

    for feature in 0..n_features {
        let mut ordered: Vec<(f64, f64)> = sample
            .iter()
            .map(|&i| (rows[i][feature], targets[i]))
            .collect();
        ordered.sort_by(|a, b| a.0.total_cmp(&b.0));

        let total_sum: f64 = ordered.iter().map(|(_, y)| y).sum();
        let total_sq: f64 = ordered.iter().map(|(_, y)| y * y).sum();
        let n = ordered.len() as f64;

        let mut left_sum = 0.0;
        let mut left_sq = 0.0;

        for k in 0..ordered.len() - 1 {
            let (x, y) = ordered[k];
            left_sum += y;
            left_sq += y * y;

            let next_x = ordered[k + 1].0;
            if x == next_x {
                continue;
            }

            let left_n = (k + 1) as f64;
            let right_n = n - left_n;
            let right_sum = total_sum - left_sum;
            let right_sq = total_sq - left_sq;

            // Sum of squared errors of both children
            let score = (left_sq - left_sum * left_sum / left_n)
                + (right_sq - right_sum * right_sum / right_n);

            if best.as_ref().map_or(true, |b| score < b.score) {
                best = Some(BestSplit {
                    feature,
                    threshold: (x + next_x) / 2.0,
                    score,
                });
            }
        }
    }

    best
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Bagged ensemble of regression trees
#[derive(Debug, Clone)]
pub struct RandomForest {
    trees: Vec<RegressionTree>,
}

impl RandomForest {
    /// Fit `n_trees` trees, each on a bootstrap sample of the rows
    ///
    /// With no rows every tree predicts 0.
    pub fn fit(rows: &[Vec<f64>], targets: &[f64], n_trees: usize, seed: u64) -> Self {
        let mut rng = SeededRng::new(seed);
        let n = rows.len().min(targets.len());

        let trees = (0..n_trees.max(1))
            .map(|_| {
                let sample: Vec<usize> = if n == 0 {
                    Vec::new()
                } else {
                    (0..n).map(|_| rng.below(n)).collect()
                };
                RegressionTree::fit(rows, targets, &sample)
            })
            .collect();

        Self { trees }
    }

    /// Mean prediction of all trees
    pub fn predict(&self, features: &[f64]) -> f64 {
        let predictions: Vec<f64> = self.trees.iter().map(|t| t.predict(features)).collect();
        mean(&predictions)
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }
}
