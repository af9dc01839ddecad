use log::info;

/// Track per-record outcomes of a refresh batch
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchTally {
    total: usize,
    succeeded: usize,
    failed: usize,
}

impl BatchTally {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            succeeded: 0,
            failed: 0,
        }
    }

    pub fn record_success(&mut self) {
        self.succeeded += 1;
        self.log_progress();
    }

    pub fn record_failure(&mut self) {
        self.failed += 1;
        self.log_progress();
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn succeeded(&self) -> usize {
        self.succeeded
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    pub fn current_count(&self) -> usize {
        self.succeeded + self.failed
    }

    /// Fold another batch's counts into this one
    pub fn absorb(&mut self, other: &BatchTally) {
        self.total += other.total;
        self.succeeded += other.succeeded;
        self.failed += other.failed;
    }

    fn log_progress(&self) {
        let current = self.current_count();
        if should_log(current, self.total) {
            info!(
                "  → Progress: {}/{} ({} updated, {} failed)",
                current, self.total, self.succeeded, self.failed
            );
        }
    }
}

fn should_log(current: usize, total: usize) -> bool {
    is_milestone(current) || is_complete(current, total)
}

fn is_milestone(count: usize) -> bool {
    count % 10 == 0
}

fn is_complete(current: usize, total: usize) -> bool {
    current == total
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tally_counts() {
        let mut tally = BatchTally::new(3);
        tally.record_success();
        tally.record_failure();
        tally.record_success();

        assert_eq!(tally.succeeded(), 2);
        assert_eq!(tally.failed(), 1);
        assert_eq!(tally.current_count(), tally.total());
    }

    #[test]
    fn test_absorb_sums_batches() {
        let mut overall = BatchTally::default();
        let mut first = BatchTally::new(2);
        first.record_success();
        first.record_failure();
        let mut second = BatchTally::new(1);
        second.record_success();

        overall.absorb(&first);
        overall.absorb(&second);

        assert_eq!(overall.total(), 3);
        assert_eq!(overall.succeeded(), 2);
        assert_eq!(overall.failed(), 1);
    }
}
