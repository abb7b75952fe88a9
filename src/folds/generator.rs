//! Fold generator with seeded shuffling and stratification

use super::fold::Fold;
use crate::data::Dataset;
use crate::error::{EvalError, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Fold count denoting leave-one-out cross-validation
pub const LEAVE_ONE_OUT: i32 = -1;

/// Generates reproducible train/test folds from a dataset
///
/// For a fixed (dataset, folds, seed, stratify) configuration two calls to
/// [`FoldGenerator::generate`] produce identical partitions.
#[derive(Clone, Debug)]
pub struct FoldGenerator {
    dataset: Dataset,
    folds: i32,
    seed: u64,
    stratify: bool,
    use_views: bool,
    preserve_order: bool,
}

impl FoldGenerator {
    /// Create a generator for `folds`-fold cross-validation
    ///
    /// `folds >= 2` selects K-fold; [`LEAVE_ONE_OUT`] selects leave-one-out.
    pub fn new(dataset: Dataset, folds: i32, seed: u64) -> Self {
        Self {
            dataset,
            folds,
            seed,
            stratify: true,
            use_views: false,
            preserve_order: false,
        }
    }

    /// Enable or disable stratification (default: enabled)
    pub fn stratify(mut self, value: bool) -> Self {
        self.stratify = value;
        self
    }

    /// Produce subsets as views instead of copies (default: copies)
    pub fn use_views(mut self, value: bool) -> Self {
        self.use_views = value;
        self
    }

    /// Keep record order: no shuffling, no stratification, seed unused
    pub fn preserve_order(mut self, value: bool) -> Self {
        self.preserve_order = value;
        self
    }

    /// Resolve the actual fold count for this generator's dataset
    pub fn actual_folds(&self) -> Result<usize> {
        let n = self.dataset.len();
        let actual = match self.folds {
            LEAVE_ONE_OUT => n,
            k if k >= 2 => k as usize,
            k => {
                return Err(EvalError::Configuration(format!(
                    "Fold count must be >= 2 or {} for leave-one-out, got {}",
                    LEAVE_ONE_OUT, k
                )))
            }
        };
        if actual > n {
            return Err(EvalError::Configuration(format!(
                "Cannot have more folds ({}) than records ({})",
                actual, n
            )));
        }
        Ok(actual)
    }

    /// Build the fold enumeration
    ///
    /// Fails fast with a `Configuration` error on an invalid fold count and
    /// with a `Data` error when stratification is requested but no target
    /// attribute is designated. The returned sequence is lazy, single-pass
    /// and not restartable; call `generate` again to reproduce it.
    pub fn generate(&self) -> Result<Folds> {
        let n = self.dataset.len();
        if n == 0 {
            return Err(EvalError::Data("Cannot fold an empty dataset".to_string()));
        }
        let actual = self.actual_folds()?;

        let stratified = if self.stratify && !self.preserve_order {
            let target = self.dataset.schema().target_attribute().ok_or_else(|| {
                EvalError::Data(
                    "Stratification requested but no target attribute is designated".to_string(),
                )
            })?;
            // numeric targets degrade to a plain shuffle
            target.kind().is_nominal() && actual < n
        } else {
            false
        };

        let mut order: Vec<usize> = (0..n).collect();
        if !self.preserve_order {
            let mut rng = StdRng::seed_from_u64(self.seed);
            order.shuffle(&mut rng);
        }

        let tests = if stratified {
            deal_by_class(&self.dataset, &order, actual)
        } else {
            chunk(&order, actual)
        };

        let original_indices = tests.iter().flatten().copied().collect();

        Ok(Folds {
            dataset: self.dataset.clone(),
            tests,
            original_indices,
            next: 0,
            seed: self.seed,
            use_views: self.use_views,
        })
    }
}

/// Contiguous chunks; the first `n % k` folds take one extra record
fn chunk(order: &[usize], k: usize) -> Vec<Vec<usize>> {
    let fold_size = order.len() / k;
    let remainder = order.len() % k;
    let mut tests = Vec::with_capacity(k);
    let mut start = 0;
    for i in 0..k {
        let end = start + fold_size + usize::from(i < remainder);
        tests.push(order[start..end].to_vec());
        start = end;
    }
    tests
}

/// Round-robin deal per class so each fold approximates the dataset's
/// class proportions
///
/// Classes are visited in the shuffled order; the dealing cursor carries
/// over between classes to keep fold sizes balanced. Records with a
/// missing class value are dealt last as their own group.
fn deal_by_class(dataset: &Dataset, order: &[usize], k: usize) -> Vec<Vec<usize>> {
    let n_classes = dataset
        .schema()
        .target_attribute()
        .map(|a| a.kind().labels().len())
        .unwrap_or(0);

    let mut by_class: Vec<Vec<usize>> = vec![Vec::new(); n_classes + 1];
    for &pos in order {
        match dataset.class_index(pos) {
            Some(c) if c < n_classes => by_class[c].push(pos),
            _ => by_class[n_classes].push(pos),
        }
    }

    let mut tests: Vec<Vec<usize>> = vec![Vec::new(); k];
    let mut cursor = 0usize;
    for group in &by_class {
        for &pos in group {
            tests[cursor % k].push(pos);
            cursor += 1;
        }
    }
    tests
}

/// Lazy, single-pass enumeration of folds
///
/// Yields each fold's train/test pair exactly once. The test subsets are
/// disjoint and cover the source dataset.
#[derive(Debug)]
pub struct Folds {
    dataset: Dataset,
    tests: Vec<Vec<usize>>,
    original_indices: Vec<usize>,
    next: usize,
    seed: u64,
    use_views: bool,
}

impl Folds {
    /// Total number of folds in this enumeration
    pub fn fold_count(&self) -> usize {
        self.tests.len()
    }

    /// Source-row indices of all test subsets, concatenated in fold order
    ///
    /// Maps per-fold predictions back to rows of the source dataset.
    pub fn original_indices(&self) -> &[usize] {
        &self.original_indices
    }

    fn build_fold(&self, index: usize) -> Result<Fold> {
        let test = self.dataset.subset(&self.tests[index], self.use_views)?;
        let train_positions: Vec<usize> = self
            .tests
            .iter()
            .enumerate()
            .filter(|(j, _)| *j != index)
            .flat_map(|(_, t)| t.iter().copied())
            .collect();
        let train = self.dataset.subset(&train_positions, self.use_views)?;
        Ok(Fold {
            index,
            train,
            test,
            seed: self.seed,
            fold_count: self.tests.len(),
        })
    }
}

impl Iterator for Folds {
    type Item = Result<Fold>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.tests.len() {
            return None;
        }
        let fold = self.build_fold(self.next);
        self.next += 1;
        Some(fold)
    }
}
