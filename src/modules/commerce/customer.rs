use super::Address;
use crate::modules::requests::ExemptionType;

/// Customer attached to a cart session or looked up for an order.
#[derive(Debug, Clone, Default)]
pub struct Customer {
    /// 0 = guest
    pub id: u64,
    pub is_vat_exempt: bool,
    pub exemption_type: Option<ExemptionType>,
    pub shipping_address: Address,
    pub billing_address: Address,
}

impl Customer {
    pub fn guest() -> Self {
        Self::default()
    }
}
