use super::error::DomainError;

/// A reviewer's verdict on a sampled death record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewSubmission {
    pub review_id: i64,
    pub death_record_id: i64,
    pub comment: String,
    pub reviewer_id: i64,
}

impl ReviewSubmission {
    pub fn new(
        review_id: i64,
        death_record_id: i64,
        comment: &str,
        reviewer_id: i64,
    ) -> Result<Self, DomainError> {
        let comment = comment.trim();
        if comment.is_empty() {
            return Err(DomainError::validation("review comment cannot be empty"));
        }
        Ok(Self {
            review_id,
            death_record_id,
            comment: comment.to_string(),
            reviewer_id,
        })
    }

    /// Reviews are written once.
    pub fn check_open(already_reviewed: bool) -> Result<(), DomainError> {
        if already_reviewed {
            return Err(DomainError::validation("this record has already been reviewed"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_comment() {
        let s = ReviewSubmission::new(1, 2, "  looks fine ", 3).unwrap();
        assert_eq!(s.comment, "looks fine");
    }

    #[test]
    fn empty_comment_is_rejected() {
        assert!(matches!(ReviewSubmission::new(1, 2, "", 3), Err(DomainError::Validation(_))));
        assert!(matches!(ReviewSubmission::new(1, 2, " \t", 3), Err(DomainError::Validation(_))));
    }

    #[test]
    fn reviewed_entries_are_terminal() {
        assert!(ReviewSubmission::check_open(false).is_ok());
        assert!(ReviewSubmission::check_open(true).is_err());
    }
}
