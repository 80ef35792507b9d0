use tracing::info;

use crate::database::models::DeathReviewRow;
use crate::database::repository::{found, reviews, touched};
use crate::database::{Database, DatabaseError};
use crate::domain::ReviewSubmission;
use crate::error::ApiError;
use crate::filter::{GeoFilter, Page, Pagination};

pub struct ReviewService {
    db: Database,
}

impl ReviewService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn list(&self, geo: &GeoFilter, pagination: Pagination) -> Result<Page<DeathReviewRow>, ApiError> {
        let items = reviews::list_reviews(self.db.pool(), geo, pagination).await?;
        let total_count = items.first().map(|r| r.total_count).unwrap_or(0);
        Ok(Page { items, total_count })
    }

    /// Closes a review. A review is written exactly once.
    pub async fn submit(&self, submission: ReviewSubmission) -> Result<(), ApiError> {
        let mut tx = self.db.begin().await?;

        let already_reviewed = found(
            reviews::lock_review_state(&mut *tx, submission.review_id, submission.death_record_id).await?,
            "Review",
        )?;
        ReviewSubmission::check_open(already_reviewed)?;
        touched(reviews::submit_review(&mut *tx, &submission).await?, "Review")?;
        tx.commit().await.map_err(DatabaseError::from)?;

        info!(
            review_id = submission.review_id,
            death_id = submission.death_record_id,
            reviewer_id = submission.reviewer_id,
            "Review submitted"
        );
        Ok(())
    }
}
