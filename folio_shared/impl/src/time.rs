use chrono::{DateTime, SubsecRound, Utc};
use folio_di::Build;
use folio_shared_contracts::time::TimeService;
use folio_utils::trace_instrument;

#[derive(Debug, Clone, Copy, Build)]
pub struct TimeServiceImpl;

impl TimeService for TimeServiceImpl {
    /// Microsecond precision, matching what the database stores.
    #[trace_instrument(skip(self))]
    fn now(&self) -> DateTime<Utc> {
        Utc::now().trunc_subsecs(6)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Timelike;

    use super::*;

    #[test]
    fn now() {
        // Arrange
        let sut = TimeServiceImpl;
        let before = Utc::now().trunc_subsecs(6);

        // Act
        let result = sut.now();

        // Assert
        assert!(before <= result && result <= Utc::now());
        assert_eq!(result.nanosecond() % 1000, 0);
    }
}
