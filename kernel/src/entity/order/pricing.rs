use destructure::Destructure;
use error_stack::Report;
use rust_decimal::Decimal;
use vodca::References;

use crate::entity::Money;
use crate::KernelError;

/// 18 %.
pub const TAX_RATE: Decimal = Decimal::from_parts(18, 0, 0, false, 2);
/// Subtotals strictly above this ship for free.
pub const FREE_SHIPPING_THRESHOLD: Decimal = Decimal::from_parts(100, 0, 0, false, 0);
pub const FLAT_SHIPPING_FEE: Decimal = Decimal::from_parts(10, 0, 0, false, 0);

#[derive(Debug, Clone, Copy, Eq, PartialEq, References, Destructure)]
pub struct OrderTotals {
    subtotal: Money,
    tax: Money,
    shipping: Money,
    total: Money,
}

impl OrderTotals {
    pub fn new(subtotal: Money, tax: Money, shipping: Money, total: Money) -> Self {
        Self {
            subtotal,
            tax,
            shipping,
            total,
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq, References)]
pub struct PricingPolicy {
    tax_rate: Decimal,
    free_shipping_threshold: Money,
    flat_shipping_fee: Money,
}

impl PricingPolicy {
    pub fn new(
        tax_rate: Decimal,
        free_shipping_threshold: Money,
        flat_shipping_fee: Money,
    ) -> error_stack::Result<Self, KernelError> {
        if tax_rate.is_sign_negative() || tax_rate > Decimal::ONE {
            return Err(Report::new(KernelError::Validation)
                .attach_printable(format!("tax rate must be within 0..=1, got {tax_rate}")));
        }
        if free_shipping_threshold.is_negative() || flat_shipping_fee.is_negative() {
            return Err(Report::new(KernelError::Validation)
                .attach_printable("shipping amounts must not be negative"));
        }
        Ok(Self {
            tax_rate,
            free_shipping_threshold,
            flat_shipping_fee,
        })
    }

    pub fn shipping_for(&self, subtotal: &Money) -> Money {
        if subtotal > &self.free_shipping_threshold {
            Money::zero()
        } else {
            self.flat_shipping_fee
        }
    }

    /// Prices a subtotal. `total` is always `subtotal + tax + shipping`.
    pub fn quote(&self, subtotal: Money) -> OrderTotals {
        let subtotal = subtotal.round();
        let tax = subtotal.percent(&self.tax_rate);
        let shipping = self.shipping_for(&subtotal);
        OrderTotals {
            subtotal,
            tax,
            shipping,
            total: subtotal + tax + shipping,
        }
    }
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            tax_rate: TAX_RATE,
            free_shipping_threshold: Money::new(FREE_SHIPPING_THRESHOLD),
            flat_shipping_fee: Money::new(FLAT_SHIPPING_FEE),
        }
    }
}
