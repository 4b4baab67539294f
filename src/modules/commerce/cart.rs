use super::{Customer, TaxBucket, LOCAL_PICKUP_METHODS};
use crate::core::Currency;
use rust_decimal::Decimal;

/// A product line in a cart.
///
/// `line_subtotal` is the pre-coupon amount, `line_total` the post-coupon
/// amount. Tax fields are written back by the cart applicator.
#[derive(Debug, Clone)]
pub struct CartItem {
    pub key: String,
    pub product_id: u64,
    pub quantity: u32,
    pub tax_class: String,
    pub taxable: bool,
    pub line_subtotal: Decimal,
    pub line_total: Decimal,
    pub line_subtotal_tax: Decimal,
    pub line_tax: Decimal,
    pub subtotal_taxes: TaxBucket,
    pub total_taxes: TaxBucket,
}

impl CartItem {
    pub fn new(
        key: impl Into<String>,
        product_id: u64,
        quantity: u32,
        line_subtotal: Decimal,
        line_total: Decimal,
    ) -> Self {
        Self {
            key: key.into(),
            product_id,
            quantity,
            tax_class: String::new(),
            taxable: true,
            line_subtotal,
            line_total,
            line_subtotal_tax: Decimal::ZERO,
            line_tax: Decimal::ZERO,
            subtotal_taxes: TaxBucket::new(),
            total_taxes: TaxBucket::new(),
        }
    }

    /// Composite join key between this line and its fetched tax detail.
    pub fn request_id(&self) -> String {
        format!("{}-{}", self.product_id, self.key)
    }
}

/// A fee line in a cart. Negative totals represent discounts.
#[derive(Debug, Clone)]
pub struct CartFee {
    pub key: String,
    pub name: String,
    pub taxable: bool,
    pub tax_class: String,
    pub total: Decimal,
    pub tax: Decimal,
    pub tax_data: TaxBucket,
}

impl CartFee {
    pub fn new(key: impl Into<String>, name: impl Into<String>, total: Decimal) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            taxable: true,
            tax_class: String::new(),
            total,
            tax: Decimal::ZERO,
            tax_data: TaxBucket::new(),
        }
    }

    pub fn request_id(&self) -> String {
        format!("fee-{}", self.key)
    }
}

/// One selectable shipping rate inside a package.
#[derive(Debug, Clone)]
pub struct ShippingRate {
    pub id: String,
    pub cost: Decimal,
    pub taxes: TaxBucket,
}

/// A shipping package with its chosen rate.
#[derive(Debug, Clone, Default)]
pub struct ShippingPackage {
    pub rates: Vec<ShippingRate>,
    pub chosen_rate_id: Option<String>,
}

impl ShippingPackage {
    pub fn chosen_rate(&self) -> Option<&ShippingRate> {
        let chosen = self.chosen_rate_id.as_deref()?;
        self.rates.iter().find(|rate| rate.id == chosen)
    }

    pub fn chosen_rate_mut(&mut self) -> Option<&mut ShippingRate> {
        let chosen = self.chosen_rate_id.clone()?;
        self.rates.iter_mut().find(|rate| rate.id == chosen)
    }
}

/// Ephemeral checkout cart. The applicator is the only component that
/// mutates its tax fields, and owns them exclusively for the duration of
/// one apply pass.
#[derive(Debug, Clone)]
pub struct Cart {
    pub currency: Currency,
    pub customer: Customer,
    pub items: Vec<CartItem>,
    pub fees: Vec<CartFee>,
    pub shipping_packages: Vec<ShippingPackage>,

    pub subtotal_tax: Decimal,
    pub cart_contents_tax: Decimal,
    pub cart_contents_taxes: TaxBucket,
    pub shipping_tax: Decimal,
    pub shipping_taxes: TaxBucket,
    pub fee_tax: Decimal,
    pub fee_taxes: TaxBucket,
    pub total_tax: Decimal,
    pub total: Decimal,

    /// Persisted calculation result JSON, raw payloads cleared.
    pub tax_calculation_results: Option<String>,
}

impl Cart {
    pub fn new(currency: Currency, customer: Customer) -> Self {
        Self {
            currency,
            customer,
            items: Vec::new(),
            fees: Vec::new(),
            shipping_packages: Vec::new(),
            subtotal_tax: Decimal::ZERO,
            cart_contents_tax: Decimal::ZERO,
            cart_contents_taxes: TaxBucket::new(),
            shipping_tax: Decimal::ZERO,
            shipping_taxes: TaxBucket::new(),
            fee_tax: Decimal::ZERO,
            fee_taxes: TaxBucket::new(),
            total_tax: Decimal::ZERO,
            total: Decimal::ZERO,
            tax_calculation_results: None,
        }
    }

    /// Merchandise subtotal before coupons.
    pub fn subtotal(&self) -> Decimal {
        self.items.iter().map(|item| item.line_subtotal).sum()
    }

    /// Merchandise total after coupons.
    pub fn cart_contents_total(&self) -> Decimal {
        self.items.iter().map(|item| item.line_total).sum()
    }

    pub fn fee_total(&self) -> Decimal {
        self.fees.iter().map(|fee| fee.total).sum()
    }

    pub fn shipping_total(&self) -> Decimal {
        self.shipping_packages
            .iter()
            .filter_map(|package| package.chosen_rate())
            .map(|rate| rate.cost)
            .sum()
    }

    pub fn chosen_shipping_method_ids(&self) -> Vec<&str> {
        self.shipping_packages
            .iter()
            .filter_map(|package| package.chosen_rate_id.as_deref())
            .collect()
    }

    pub fn has_local_pickup(&self) -> bool {
        self.chosen_shipping_method_ids()
            .iter()
            .any(|id| LOCAL_PICKUP_METHODS.contains(id))
    }
}
