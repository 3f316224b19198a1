use console::style;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
    Info,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: &'static str,
    pub message: String,
}

impl Notice {
    fn new(kind: NoticeKind, title: &'static str, message: &str) -> Self {
        Notice {
            kind,
            title,
            message: message.to_string(),
        }
    }

    pub fn item_fulfilled() -> Self {
        Notice::new(
            NoticeKind::Success,
            "Item Fulfilled",
            "Item has been successfully fulfilled",
        )
    }

    pub fn fulfillment_failed() -> Self {
        Notice::new(NoticeKind::Error, "Error", "Failed to fulfill item")
    }

    pub fn invalid_barcode() -> Self {
        Notice::new(
            NoticeKind::Error,
            "Invalid Barcode",
            "Could not identify product from barcode",
        )
    }

    pub fn scan_error() -> Self {
        Notice::new(
            NoticeKind::Error,
            "Scan Error",
            "Failed to process barcode scan",
        )
    }

    pub fn product_not_found() -> Self {
        Notice::new(
            NoticeKind::Error,
            "Product Not Found",
            "No product found matching the entered SKU",
        )
    }

    pub fn search_error() -> Self {
        Notice::new(NoticeKind::Error, "Search Error", "Failed to search for product")
    }

    pub fn no_items_to_fulfill() -> Self {
        Notice::new(
            NoticeKind::Info,
            "No Items to Fulfill",
            "All items in this order have been fulfilled",
        )
    }

    pub fn item_marked_unavailable() -> Self {
        Notice::new(
            NoticeKind::Warning,
            "Item Marked Unavailable",
            "Item has been marked as unavailable",
        )
    }
}

pub fn emit(notice: &Notice) {
    let title = match notice.kind {
        NoticeKind::Success => style(notice.title).green().bold(),
        NoticeKind::Error => style(notice.title).red().bold(),
        NoticeKind::Info => style(notice.title).blue().bold(),
        NoticeKind::Warning => style(notice.title).yellow().bold(),
    };
    println!("{title}: {}", notice.message);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notice_kinds_follow_severity() {
        assert_eq!(Notice::item_fulfilled().kind, NoticeKind::Success);
        assert_eq!(Notice::fulfillment_failed().kind, NoticeKind::Error);
        assert_eq!(Notice::invalid_barcode().kind, NoticeKind::Error);
        assert_eq!(Notice::no_items_to_fulfill().kind, NoticeKind::Info);
        assert_eq!(Notice::item_marked_unavailable().kind, NoticeKind::Warning);
    }

    #[test]
    fn not_found_variants_use_distinct_titles() {
        assert_ne!(
            Notice::invalid_barcode().title,
            Notice::product_not_found().title
        );
    }
}
