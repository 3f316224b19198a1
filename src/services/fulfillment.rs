use uuid::Uuid;

use crate::models::{FulfillmentProgress, LineItem, LineItemUpdate, Part, SalesOrder};
use crate::services::api::{ApiClient, ApiError};
use crate::services::matcher::{self, MatchResult};
use crate::services::notify::{self, Notice};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveSource {
    Barcode,
    Search,
}

// Holds one scanned candidate against the open line it would substitute,
// from mismatch detection until the user confirms or cancels.
#[derive(Debug, Clone, PartialEq)]
pub struct SubstitutionDecision {
    pub expected: LineItem,
    pub scanned: Part,
}

pub struct FulfillmentSession {
    client: ApiClient,
    session_id: Uuid,
    order: SalesOrder,
    lines: Vec<LineItem>,
    pending_substitution: Option<SubstitutionDecision>,
}

impl FulfillmentSession {
    pub async fn start(client: ApiClient, order_id: i64) -> Result<Self, ApiError> {
        let order = client.get_order(order_id).await?;
        let lines = client.list_order_lines(order_id, false).await?;
        let session_id = Uuid::new_v4();
        tracing::info!(
            session = %session_id,
            order = %order.reference,
            lines = lines.len(),
            "fulfillment session started"
        );
        Ok(FulfillmentSession {
            client,
            session_id,
            order,
            lines,
            pending_substitution: None,
        })
    }

    pub fn order(&self) -> &SalesOrder {
        &self.order
    }

    pub fn lines(&self) -> &[LineItem] {
        &self.lines
    }

    pub fn progress(&self) -> FulfillmentProgress {
        matcher::progress(&self.lines)
    }

    pub fn pending_substitution(&self) -> Option<&SubstitutionDecision> {
        self.pending_substitution.as_ref()
    }

    // State is server-authoritative: re-fetch rather than merge local deltas.
    pub async fn refresh(&mut self) -> Result<(), ApiError> {
        self.order = self.client.get_order(self.order.pk).await?;
        self.lines = self.client.list_order_lines(self.order.pk, false).await?;
        Ok(())
    }

    pub async fn handle_scan(&mut self, barcode: &str) {
        match self.client.scan_barcode(barcode).await {
            Ok(part) => self.dispatch(part).await,
            Err(err) => {
                tracing::warn!(session = %self.session_id, error = %err, "barcode resolution failed");
                notify::emit(&resolution_failure_notice(ResolveSource::Barcode, &err));
            }
        }
    }

    pub async fn handle_search(&mut self, query: &str) {
        match self.client.search_part(query).await {
            Ok(part) => self.dispatch(part).await,
            Err(err) => {
                tracing::warn!(session = %self.session_id, error = %err, "product search failed");
                notify::emit(&resolution_failure_notice(ResolveSource::Search, &err));
            }
        }
    }

    async fn dispatch(&mut self, scanned: Part) {
        match matcher::match_scanned(&scanned, &self.lines) {
            MatchResult::ExactMatch(line) => {
                tracing::info!(session = %self.session_id, line = line.pk, "exact match, fulfilling");
                self.fulfill(&line, 1.0, None).await;
            }
            MatchResult::SubstitutionCandidate { line, scanned } => {
                tracing::info!(
                    session = %self.session_id,
                    line = line.pk,
                    scanned_part = scanned.pk,
                    "no exact match, proposing substitution"
                );
                self.pending_substitution = Some(SubstitutionDecision {
                    expected: line,
                    scanned,
                });
            }
            MatchResult::NoOpenLines => {
                notify::emit(&Notice::no_items_to_fulfill());
            }
        }
    }

    pub async fn confirm_substitution(&mut self) {
        if let Some(decision) = self.pending_substitution.take() {
            self.fulfill(&decision.expected, 1.0, Some(decision.scanned.pk))
                .await;
        }
    }

    pub fn cancel_substitution(&mut self) {
        self.pending_substitution = None;
    }

    // The server owns the shipped <= quantity invariant; the update is
    // submitted unvalidated and a rejection surfaces as a failure notice.
    async fn fulfill(&mut self, line: &LineItem, quantity: f64, substitute: Option<i64>) {
        let update = build_line_update(line, quantity, substitute);
        match self.client.update_line_item(line.pk, &update).await {
            Ok(_) => {
                if let Err(err) = self.refresh().await {
                    tracing::warn!(session = %self.session_id, error = %err, "refresh after fulfillment failed");
                }
                notify::emit(&Notice::item_fulfilled());
            }
            Err(err) => {
                tracing::warn!(session = %self.session_id, line = line.pk, error = %err, "line update rejected");
                notify::emit(&Notice::fulfillment_failed());
            }
        }
    }
}

// Increment from the latest known snapshot; stale snapshots yield the same
// target value twice rather than compounding.
pub fn build_line_update(
    line: &LineItem,
    quantity: f64,
    substitute: Option<i64>,
) -> LineItemUpdate {
    LineItemUpdate {
        shipped: line.shipped + quantity,
        part: substitute,
    }
}

pub fn resolution_failure_notice(source: ResolveSource, error: &ApiError) -> Notice {
    match (source, error) {
        (ResolveSource::Barcode, ApiError::NotFound) => Notice::invalid_barcode(),
        (ResolveSource::Barcode, _) => Notice::scan_error(),
        (ResolveSource::Search, ApiError::NotFound) => Notice::product_not_found(),
        (ResolveSource::Search, _) => Notice::search_error(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn part(pk: i64) -> Part {
        Part {
            pk,
            name: format!("Part {pk}"),
            description: None,
            ipn: None,
        }
    }

    fn line(pk: i64, part: i64, quantity: f64, shipped: f64) -> LineItem {
        LineItem {
            pk,
            part,
            part_detail: None,
            quantity,
            shipped,
            sale_price: None,
            sale_price_currency: None,
            reference: None,
            notes: None,
        }
    }

    fn session(lines: Vec<LineItem>) -> FulfillmentSession {
        FulfillmentSession {
            client: ApiClient::new("http://localhost:8000", "test-token".to_string()),
            session_id: Uuid::new_v4(),
            order: SalesOrder {
                pk: 1,
                reference: "SO-0001".to_string(),
                description: None,
                customer: 1,
                customer_detail: None,
                status: 15,
                target_date: None,
                overdue: false,
                line_items: lines.len() as i64,
                shipped_lines: 0,
            },
            lines,
            pending_substitution: None,
        }
    }

    #[test]
    fn update_increments_shipped_by_scan_quantity() {
        let update = build_line_update(&line(1, 100, 5.0, 2.0), 1.0, None);
        assert_eq!(update.shipped, 3.0);
        assert_eq!(update.part, None);
    }

    #[test]
    fn stale_snapshot_yields_same_target_twice() {
        let stale = line(1, 100, 5.0, 2.0);
        let first = build_line_update(&stale, 1.0, None);
        let second = build_line_update(&stale, 1.0, None);
        assert_eq!(first.shipped, 3.0);
        assert_eq!(second.shipped, 3.0);
    }

    #[test]
    fn substitution_reassigns_part_reference() {
        let update = build_line_update(&line(1, 100, 2.0, 0.0), 1.0, Some(300));
        assert_eq!(update.shipped, 1.0);
        assert_eq!(update.part, Some(300));
    }

    #[test]
    fn barcode_failures_map_to_distinct_notices() {
        assert_eq!(
            resolution_failure_notice(ResolveSource::Barcode, &ApiError::NotFound),
            Notice::invalid_barcode()
        );
        assert_eq!(
            resolution_failure_notice(
                ResolveSource::Barcode,
                &ApiError::Unexpected { status: 502 }
            ),
            Notice::scan_error()
        );
        assert_eq!(
            resolution_failure_notice(ResolveSource::Search, &ApiError::NotFound),
            Notice::product_not_found()
        );
        assert_eq!(
            resolution_failure_notice(
                ResolveSource::Search,
                &ApiError::Validation {
                    detail: "bad query".to_string()
                }
            ),
            Notice::search_error()
        );
    }

    #[tokio::test]
    async fn mismatched_scan_holds_decision_until_cancelled() {
        let mut session = session(vec![line(1, 100, 1.0, 1.0), line(2, 200, 2.0, 0.0)]);
        session.dispatch(part(300)).await;

        let decision = session.pending_substitution().expect("decision held");
        assert_eq!(decision.expected.pk, 2);
        assert_eq!(decision.scanned.pk, 300);

        session.cancel_substitution();
        assert!(session.pending_substitution().is_none());
    }

    #[tokio::test]
    async fn fully_shipped_order_leaves_no_pending_decision() {
        let mut session = session(vec![line(1, 100, 1.0, 1.0)]);
        session.dispatch(part(300)).await;
        assert!(session.pending_substitution().is_none());
    }
}
