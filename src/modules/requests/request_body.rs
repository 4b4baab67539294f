use crate::core::{CalculationError, Result, StopReason};
use crate::modules::commerce::Address;
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Exemption attached to a customer or transaction to suppress calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExemptionType {
    Wholesale,
    Government,
    Other,
    NonExempt,
}

impl ExemptionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExemptionType::Wholesale => "wholesale",
            ExemptionType::Government => "government",
            ExemptionType::Other => "other",
            ExemptionType::NonExempt => "non_exempt",
        }
    }
}

/// Product tax code sent for lines that must not be taxed.
pub const NON_TAXABLE_TAX_CODE: &str = "99999";

/// One line of a rate request. Fees use quantity 1 and a `fee-` prefixed id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestLineItem {
    /// Composite key: `"<productId>-<lineKey>"` or `"fee-<lineKey>"`.
    pub id: String,
    pub quantity: u32,
    pub product_tax_code: String,
    pub unit_price: Decimal,
    pub discount: Decimal,
}

/// Per-country postal code formats accepted by the rate API.
static POSTAL_REGEXES: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    [
        ("US", r"^\d{5}([ \-]\d{4})?$"),
        ("CA", r"^[ABCEGHJKLMNPRSTVXY]\d[ABCEGHJ-NPRSTV-Z][ ]?\d[ABCEGHJ-NPRSTV-Z]\d$"),
        ("UK", r"^GIR[ ]?0AA|((AB|AL|B|BA|BB|BD|BH|BL|BN|BR|BS|BT|CA|CB|CF|CH|CM|CO|CR|CT|CV|CW|DA|DD|DE|DG|DH|DL|DN|DT|DY|E|EC|EH|EN|EX|FK|FY|G|GL|GY|GU|HA|HD|HG|HP|HR|HS|HU|HX|IG|IM|IP|IV|JE|KA|KT|KW|KY|L|LA|LD|LE|LL|LN|LS|LU|M|ME|MK|ML|N|NE|NG|NN|NP|NR|NW|OL|OX|PA|PE|PH|PL|PO|PR|RG|RH|RM|S|SA|SE|SG|SK|SL|SM|SN|SO|SP|SR|SS|ST|SW|SY|TA|TD|TF|TN|TQ|TR|TS|TW|UB|W|WA|WC|WD|WF|WN|WR|WS|WV|YO|ZE)(\d[\dA-Z]?[ ]?\d[ABD-HJLN-UW-Z]{2}))|BFPO[ ]?\d{1,4}$"),
        ("FR", r"^\d{2}[ ]?\d{3}$"),
        ("IT", r"^\d{5}$"),
        ("DE", r"^\d{5}$"),
        ("NL", r"^\d{4}[ ]?[A-Z]{2}$"),
        ("ES", r"^\d{5}$"),
        ("DK", r"^\d{4}$"),
        ("SE", r"^\d{3}[ ]?\d{2}$"),
        ("BE", r"^\d{4}$"),
        ("IN", r"^\d{6}$"),
        ("AU", r"^\d{4}$"),
    ]
    .into_iter()
    .map(|(country, pattern)| {
        (
            country,
            Regex::new(pattern).expect("postal regex is valid"),
        )
    })
    .collect()
});

/// Checks a postal code against the known format for its country.
///
/// The rate API accepts requests with no zip outside of the US, so an empty
/// zip is valid for every known country except the US. Unknown countries are
/// always valid.
pub fn is_postal_code_valid(country: &str, zip: &str) -> bool {
    let Some((_, pattern)) = POSTAL_REGEXES.iter().find(|(c, _)| *c == country) else {
        return true;
    };

    if zip.is_empty() {
        return country != "US";
    }

    pattern.is_match(zip)
}

/// Canonical rate request, assembled fresh per calculation attempt.
///
/// Serialized once into its payload form, which doubles as the cache
/// fingerprint; immutable after the builder returns it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxRequestBody {
    pub from: Address,
    pub to: Address,
    pub line_items: Vec<RequestLineItem>,
    pub shipping_amount: Decimal,
    /// 0 = guest
    pub customer_id: u64,
    pub exemption_type: Option<ExemptionType>,
}

impl TaxRequestBody {
    /// Ensures the body contains enough information for tax calculation.
    pub fn validate(&self) -> Result<()> {
        self.validate_country_is_present()?;
        self.validate_zip_code_is_present()?;
        self.validate_line_items_or_shipping_amount_are_present()?;
        self.validate_zip_code_format()
    }

    fn validate_country_is_present(&self) -> Result<()> {
        if self.to.country.is_empty() {
            return Err(CalculationError::stop(
                StopReason::MissingRequiredFieldCountry,
                "Country field is required to perform tax calculation.",
            ));
        }
        Ok(())
    }

    fn validate_zip_code_is_present(&self) -> Result<()> {
        if self.to.postcode.is_empty() {
            return Err(CalculationError::stop(
                StopReason::MissingRequiredFieldZip,
                "Zip code is required to perform tax calculation.",
            ));
        }
        Ok(())
    }

    fn validate_line_items_or_shipping_amount_are_present(&self) -> Result<()> {
        if self.line_items.is_empty() && self.shipping_amount.is_zero() {
            return Err(CalculationError::stop(
                StopReason::MissingRequiredFieldLineItemOrShipping,
                "Either a line item or shipping amount is required to calculate tax.",
            ));
        }
        Ok(())
    }

    fn validate_zip_code_format(&self) -> Result<()> {
        if !is_postal_code_valid(&self.to.country, &self.to.postcode) {
            return Err(CalculationError::stop(
                StopReason::InvalidFieldZip,
                "Invalid zip code. The to address zip code does not match the format required for the country.",
            ));
        }
        Ok(())
    }

    /// Canonical payload sent to the rate API and hashed for the cache key.
    pub fn to_payload(&self) -> Value {
        let mut payload = json!({
            "from_country": self.from.country,
            "from_state": self.from.state,
            "from_zip": self.from.postcode,
            "from_city": self.from.city,
            "from_street": self.from.street,
            "to_country": self.to.country,
            "to_state": self.to.state,
            "to_zip": self.to.postcode,
            "to_city": self.to.city,
            "to_street": self.to.street,
            "shipping": self.shipping_amount,
            "plugin": "taxflow",
        });

        let map = payload.as_object_mut().expect("payload is an object");

        if self.customer_id != 0 {
            map.insert("customer_id".to_string(), json!(self.customer_id));
        }

        if let Some(exemption_type) = self.exemption_type {
            map.insert("exemption_type".to_string(), json!(exemption_type));
        }

        // Either `amount` or `line_items` is required by the rate API.
        if self.line_items.is_empty() {
            map.insert("amount".to_string(), json!(0.0));
        } else {
            map.insert("line_items".to_string(), json!(self.line_items));
        }

        payload
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.to_payload())?)
    }
}
