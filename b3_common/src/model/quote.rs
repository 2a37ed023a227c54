//! Quote snapshot read from the chart metadata block.

/// Marker shown for any value the upstream payload did not carry.
pub const UNKNOWN: &str = "N/A";

/// One point-in-time read of a ticker. Absent fields stay `None`, never zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuoteSnapshot {
    /// Last regular-market price.
    pub price: Option<f64>,
    /// Short company name.
    pub company_name: Option<String>,
    /// Regular-market volume.
    pub volume: Option<u64>,
    /// Change versus previous close, in percent.
    pub change_percent: Option<f64>,
}

impl QuoteSnapshot {
    /// `true` when the payload carried none of the fields.
    pub fn is_empty(&self) -> bool {
        self.price.is_none()
            && self.company_name.is_none()
            && self.volume.is_none()
            && self.change_percent.is_none()
    }

    /// Price with two decimals, or the unknown marker.
    pub fn price_display(&self) -> String {
        self.price
            .map(|p| format!("{:.2}", p))
            .unwrap_or_else(|| UNKNOWN.to_string())
    }

    /// `Preço Atual: R$ 32.55 (+1.23%)`
    pub fn price_line(&self) -> String {
        format!(
            "Preço Atual: R$ {} ({})",
            self.price_display(),
            format_change_percent(self.change_percent)
        )
    }
}

/// Render a percent change. Positive values get a leading `+`; zero and
/// negative values are printed as-is; `None` renders as [`UNKNOWN`].
pub fn format_change_percent(change: Option<f64>) -> String {
    match change {
        None => UNKNOWN.to_string(),
        Some(v) if v > 0.0 => format!("+{:.2}%", v),
        Some(v) => format!("{:.2}%", v),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_line_with_positive_change() {
        let quote = QuoteSnapshot {
            price: Some(32.55),
            change_percent: Some(1.23),
            ..Default::default()
        };
        assert_eq!(quote.price_line(), "Preço Atual: R$ 32.55 (+1.23%)");
    }

    #[test]
    fn change_sign_rules() {
        assert_eq!(format_change_percent(Some(0.0)), "0.00%");
        assert_eq!(format_change_percent(Some(-2.5)), "-2.50%");
        assert_eq!(format_change_percent(Some(0.004)), "+0.00%");
        assert_eq!(format_change_percent(None), "N/A");
    }

    #[test]
    fn absent_fields_render_unknown() {
        let quote = QuoteSnapshot::default();
        assert!(quote.is_empty());
        assert_eq!(quote.price_line(), "Preço Atual: R$ N/A (N/A)");
    }
}
