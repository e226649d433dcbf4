use serde::Serialize;

use crate::{TradingDate, ValidationError};

/// Closing price for a single trading date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PricePoint {
    pub date: TradingDate,
    pub close: f64,
}

impl PricePoint {
    pub fn new(date: TradingDate, close: f64) -> Result<Self, ValidationError> {
        validate_non_negative("close", close)?;
        Ok(Self { date, close })
    }
}

/// Daily closing prices, strictly ascending by date.
///
/// Immutable once built; a fresh fetch produces a new series.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Sorts the points by date and rejects duplicate dates.
    pub fn new(mut points: Vec<PricePoint>) -> Result<Self, ValidationError> {
        points.sort_by_key(|point| point.date);

        if let Some(pair) = points.windows(2).find(|pair| pair[0].date == pair[1].date) {
            return Err(ValidationError::DuplicateDate {
                date: pair[1].date.format_iso(),
            });
        }

        Ok(Self { points })
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

fn validate_non_negative(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteValue { field });
    }
    if value < 0.0 {
        return Err(ValidationError::NegativeValue { field });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(date: &str, close: f64) -> PricePoint {
        PricePoint::new(TradingDate::parse(date).expect("date"), close).expect("point")
    }

    #[test]
    fn rejects_negative_and_non_finite_closes() {
        let date = TradingDate::parse("2024-01-02").expect("date");
        assert_eq!(
            PricePoint::new(date, -1.0),
            Err(ValidationError::NegativeValue { field: "close" })
        );
        assert_eq!(
            PricePoint::new(date, f64::NAN),
            Err(ValidationError::NonFiniteValue { field: "close" })
        );
        assert!(PricePoint::new(date, 0.0).is_ok());
    }

    #[test]
    fn series_is_sorted_ascending() {
        let series = PriceSeries::new(vec![
            point("2024-01-04", 184.9),
            point("2024-01-02", 185.6),
            point("2024-01-03", 186.2),
        ])
        .expect("series");

        let dates = series
            .points()
            .iter()
            .map(|p| p.date.format_iso())
            .collect::<Vec<_>>();
        assert_eq!(dates, vec!["2024-01-02", "2024-01-03", "2024-01-04"]);
    }

    #[test]
    fn series_rejects_duplicate_dates() {
        let err = PriceSeries::new(vec![point("2024-01-02", 1.0), point("2024-01-02", 2.0)])
            .expect_err("duplicates must fail");
        assert_eq!(
            err,
            ValidationError::DuplicateDate {
                date: String::from("2024-01-02")
            }
        );
    }

    #[test]
    fn serializes_as_array_of_date_close_pairs() {
        let series = PriceSeries::new(vec![point("2024-01-02", 185.6)]).expect("series");
        let json = serde_json::to_value(&series).expect("serializes");
        assert_eq!(json, serde_json::json!([{ "date": "2024-01-02", "close": 185.6 }]));
    }
}
