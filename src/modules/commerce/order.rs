use super::{Address, TaxBucket, LOCAL_PICKUP_METHODS};
use crate::core::Currency;
use crate::modules::requests::ExemptionType;
use rust_decimal::Decimal;
use std::collections::HashMap;

/// A product line on a persisted order.
#[derive(Debug, Clone)]
pub struct OrderItem {
    pub key: String,
    pub product_id: u64,
    pub quantity: u32,
    pub tax_class: String,
    pub taxable: bool,
    pub subtotal: Decimal,
    pub total: Decimal,
    pub subtotal_taxes: TaxBucket,
    pub total_taxes: TaxBucket,
}

impl OrderItem {
    pub fn new(
        key: impl Into<String>,
        product_id: u64,
        quantity: u32,
        subtotal: Decimal,
        total: Decimal,
    ) -> Self {
        Self {
            key: key.into(),
            product_id,
            quantity,
            tax_class: String::new(),
            taxable: true,
            subtotal,
            total,
            subtotal_taxes: TaxBucket::new(),
            total_taxes: TaxBucket::new(),
        }
    }

    pub fn request_id(&self) -> String {
        format!("{}-{}", self.product_id, self.key)
    }

    pub fn total_tax(&self) -> Decimal {
        self.total_taxes.values().copied().sum()
    }

    pub fn subtotal_tax(&self) -> Decimal {
        self.subtotal_taxes.values().copied().sum()
    }
}

/// A fee line on a persisted order.
#[derive(Debug, Clone)]
pub struct OrderFee {
    pub key: String,
    pub tax_class: String,
    pub taxable: bool,
    pub total: Decimal,
    pub total_taxes: TaxBucket,
}

impl OrderFee {
    pub fn new(key: impl Into<String>, total: Decimal) -> Self {
        Self {
            key: key.into(),
            tax_class: String::new(),
            taxable: true,
            total,
            total_taxes: TaxBucket::new(),
        }
    }

    pub fn request_id(&self) -> String {
        format!("fee-{}", self.key)
    }

    pub fn total_tax(&self) -> Decimal {
        self.total_taxes.values().copied().sum()
    }
}

/// A shipping line on a persisted order.
#[derive(Debug, Clone)]
pub struct ShippingLine {
    pub method_id: String,
    pub total: Decimal,
    pub total_taxes: TaxBucket,
}

impl ShippingLine {
    pub fn new(method_id: impl Into<String>, total: Decimal) -> Self {
        Self {
            method_id: method_id.into(),
            total,
            total_taxes: TaxBucket::new(),
        }
    }

    pub fn total_tax(&self) -> Decimal {
        self.total_taxes.values().copied().sum()
    }
}

/// Persisted order having tax calculated.
#[derive(Debug, Clone)]
pub struct Order {
    pub id: u64,
    pub currency: Currency,
    pub customer_id: u64,
    /// Legacy order-level exemption flag.
    pub vat_exempt: bool,
    pub exemption_type: Option<ExemptionType>,
    pub shipping_address: Address,
    pub billing_address: Address,
    pub items: Vec<OrderItem>,
    pub fees: Vec<OrderFee>,
    pub shipping_lines: Vec<ShippingLine>,

    pub cart_tax: Decimal,
    pub shipping_tax: Decimal,
    pub discount_tax: Decimal,
    pub total: Decimal,

    pub meta: HashMap<String, String>,
}

impl Order {
    pub fn new(id: u64, currency: Currency) -> Self {
        Self {
            id,
            currency,
            customer_id: 0,
            vat_exempt: false,
            exemption_type: None,
            shipping_address: Address::default(),
            billing_address: Address::default(),
            items: Vec::new(),
            fees: Vec::new(),
            shipping_lines: Vec::new(),
            cart_tax: Decimal::ZERO,
            shipping_tax: Decimal::ZERO,
            discount_tax: Decimal::ZERO,
            total: Decimal::ZERO,
            meta: HashMap::new(),
        }
    }

    /// Merchandise subtotal before discounts.
    pub fn subtotal(&self) -> Decimal {
        self.items.iter().map(|item| item.subtotal).sum()
    }

    pub fn total_fees(&self) -> Decimal {
        self.fees.iter().map(|fee| fee.total).sum()
    }

    pub fn shipping_total(&self) -> Decimal {
        self.shipping_lines.iter().map(|line| line.total).sum()
    }

    pub fn has_shipping_method(&self, method_id: &str) -> bool {
        self.shipping_lines
            .iter()
            .any(|line| line.method_id == method_id)
    }

    pub fn has_local_pickup(&self) -> bool {
        LOCAL_PICKUP_METHODS
            .iter()
            .any(|method| self.has_shipping_method(method))
    }

    /// Strips all previously applied tax rows before a fresh application.
    pub fn remove_tax_items(&mut self) {
        for item in &mut self.items {
            item.subtotal_taxes.clear();
            item.total_taxes.clear();
        }
        for fee in &mut self.fees {
            fee.total_taxes.clear();
        }
        for line in &mut self.shipping_lines {
            line.total_taxes.clear();
        }
        self.cart_tax = Decimal::ZERO;
        self.shipping_tax = Decimal::ZERO;
        self.discount_tax = Decimal::ZERO;
    }

    /// Recomputes the order-level tax totals from the item rows.
    pub fn update_taxes(&mut self) {
        let item_tax: Decimal = self.items.iter().map(|item| item.total_tax()).sum();
        let fee_tax: Decimal = self.fees.iter().map(|fee| fee.total_tax()).sum();
        self.cart_tax = item_tax + fee_tax;
        self.shipping_tax = self
            .shipping_lines
            .iter()
            .map(|line| line.total_tax())
            .sum();
    }

    /// Sum of per-item totals, each rounded to the currency minor unit.
    pub fn rounded_items_total(&self) -> Decimal {
        self.items
            .iter()
            .map(|item| self.currency.round(item.total))
            .sum()
    }
}
