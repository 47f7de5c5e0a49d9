//! Report row models and the price-band partitioning.

use rust_decimal::Decimal;
use serde::Serialize;

use inventory_core::{Email, Price, ProductId, UserId};

/// One row of the users-ranked-by-product-count report.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct UserProductCountRow {
    /// User ID.
    pub user_id: UserId,
    /// User display name.
    pub name: String,
    /// User email.
    pub email: Email,
    /// Number of products linked to the user (zero included).
    pub total_products: i64,
}

/// One row of the most-expensive-product-per-user report.
///
/// A user with several products tied at their maximum price produces one row
/// per tied product.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct UserMaxPriceRow {
    /// User ID.
    pub user_id: UserId,
    /// User display name.
    pub user_name: String,
    /// Product ID.
    pub product_id: ProductId,
    /// Product display name.
    pub product_name: String,
    /// The user's maximum price.
    pub price: Price,
}

/// The five fixed price bands, half-open on the right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PriceBand {
    /// [0, 50)
    UpTo50,
    /// [50, 100)
    UpTo100,
    /// [100, 200)
    UpTo200,
    /// [200, 500)
    UpTo500,
    /// [500, ∞)
    Above500,
}

impl PriceBand {
    /// All bands in ascending order.
    pub const ALL: [Self; 5] = [
        Self::UpTo50,
        Self::UpTo100,
        Self::UpTo200,
        Self::UpTo500,
        Self::Above500,
    ];

    /// The band a price falls into. Prices are non-negative by construction.
    #[must_use]
    pub fn for_price(price: Decimal) -> Self {
        if price < Decimal::from(50) {
            Self::UpTo50
        } else if price < Decimal::from(100) {
            Self::UpTo100
        } else if price < Decimal::from(200) {
            Self::UpTo200
        } else if price < Decimal::from(500) {
            Self::UpTo500
        } else {
            Self::Above500
        }
    }

    /// 1-based band number, ascending with price.
    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            Self::UpTo50 => 1,
            Self::UpTo100 => 2,
            Self::UpTo200 => 3,
            Self::UpTo500 => 4,
            Self::Above500 => 5,
        }
    }

    /// Display label, as the front end renders it.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::UpTo50 => "R$ 0,00 - R$ 50,00",
            Self::UpTo100 => "R$ 50,00 - R$ 100,00",
            Self::UpTo200 => "R$ 100,00 - R$ 200,00",
            Self::UpTo500 => "R$ 200,00 - R$ 500,00",
            Self::Above500 => "R$ 500,00+",
        }
    }
}

/// One row of the product-count-by-price-band report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceBandCount {
    /// 1-based band number.
    pub band: u8,
    /// Display label for the band.
    pub label: &'static str,
    /// Number of products in the band.
    pub count: u64,
}

/// Partition prices into the five fixed bands and count per band.
///
/// Bands with zero products are omitted; emitted rows are ordered by
/// ascending band number.
#[must_use]
pub fn count_by_band<I>(prices: I) -> Vec<PriceBandCount>
where
    I: IntoIterator<Item = Decimal>,
{
    let mut counts = [0u64; 5];
    for price in prices {
        let slot = usize::from(PriceBand::for_price(price).number() - 1);
        if let Some(c) = counts.get_mut(slot) {
            *c += 1;
        }
    }

    PriceBand::ALL
        .into_iter()
        .zip(counts)
        .filter(|&(_, count)| count > 0)
        .map(|(band, count)| PriceBandCount {
            band: band.number(),
            label: band.label(),
            count,
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_band_boundaries_are_half_open() {
        assert_eq!(PriceBand::for_price(d("0")), PriceBand::UpTo50);
        assert_eq!(PriceBand::for_price(d("49.99")), PriceBand::UpTo50);
        assert_eq!(PriceBand::for_price(d("50")), PriceBand::UpTo100);
        assert_eq!(PriceBand::for_price(d("99.99")), PriceBand::UpTo100);
        assert_eq!(PriceBand::for_price(d("100")), PriceBand::UpTo200);
        assert_eq!(PriceBand::for_price(d("199.99")), PriceBand::UpTo200);
        assert_eq!(PriceBand::for_price(d("200")), PriceBand::UpTo500);
        assert_eq!(PriceBand::for_price(d("499.99")), PriceBand::UpTo500);
        assert_eq!(PriceBand::for_price(d("500")), PriceBand::Above500);
        assert_eq!(PriceBand::for_price(d("2999.99")), PriceBand::Above500);
    }

    #[test]
    fn test_count_by_band_omits_empty_bands() {
        // 50 sits on a band edge and belongs to [50, 100); band 4 stays empty
        let prices = [d("10"), d("49"), d("50"), d("150"), d("600")];
        let rows = count_by_band(prices);

        assert_eq!(
            rows,
            vec![
                PriceBandCount {
                    band: 1,
                    label: "R$ 0,00 - R$ 50,00",
                    count: 2,
                },
                PriceBandCount {
                    band: 2,
                    label: "R$ 50,00 - R$ 100,00",
                    count: 1,
                },
                PriceBandCount {
                    band: 3,
                    label: "R$ 100,00 - R$ 200,00",
                    count: 1,
                },
                PriceBandCount {
                    band: 5,
                    label: "R$ 500,00+",
                    count: 1,
                },
            ]
        );
    }

    #[test]
    fn test_count_by_band_empty_input() {
        assert!(count_by_band(std::iter::empty()).is_empty());
    }

    #[test]
    fn test_count_by_band_orders_ascending() {
        let prices = [d("700"), d("5"), d("250")];
        let bands: Vec<u8> = count_by_band(prices).into_iter().map(|r| r.band).collect();
        assert_eq!(bands, vec![1, 4, 5]);
    }
}
