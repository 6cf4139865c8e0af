//! Text codec for the persisted cart.
//!
//! The slot holds a JSON array of line records. JSON numbers are read back as
//! doubles by most consumers, so every 64-bit field (ids, prices, stock) is
//! written as its exact decimal string. Quantities stay native numbers: they
//! are `u32` and always fit.
//!
//! ```text
//! [{"product":{"id":"7","name":"Rose Gold Hoops","category":"jewellery",
//!   "price":"50000","stockQuantity":"12",...},"quantity":2}]
//! ```

use std::collections::HashSet;

use crate::cart::CartState;
use crate::error::CommerceError;

/// Serde adapter writing a `u64` as a decimal string.
pub mod decimal {
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &u64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.trim().parse::<u64>().map_err(de::Error::custom)
    }
}

/// Encode cart lines into slot text.
pub fn encode(state: &CartState) -> Result<String, CommerceError> {
    Ok(serde_json::to_string(state)?)
}

/// Decode slot text, rejecting anything that breaks the cart invariants.
pub fn try_decode(text: &str) -> Result<CartState, CommerceError> {
    let state: CartState =
        serde_json::from_str(text).map_err(|e| CommerceError::Codec(e.to_string()))?;

    let mut seen = HashSet::with_capacity(state.lines.len());
    for line in &state.lines {
        if line.quantity == 0 {
            return Err(CommerceError::Codec(format!(
                "line for product {} has zero quantity",
                line.product.id
            )));
        }
        if !seen.insert(line.product.id) {
            return Err(CommerceError::Codec(format!(
                "duplicate line for product {}",
                line.product.id
            )));
        }
    }

    Ok(state)
}

/// Decode slot text, substituting an empty cart for anything unreadable.
///
/// Persistence corruption must never block the shopper, so this never fails.
pub fn decode(text: &str) -> CartState {
    match try_decode(text) {
        Ok(state) => state,
        Err(e) => {
            tracing::warn!(error = %e, "discarding unreadable cart");
            CartState::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::CartLine;
    use crate::catalog::{Product, ProductCategory};
    use crate::ids::ProductId;

    fn extreme_product(id: u64) -> Product {
        let mut product = Product::new(ProductId::new(id), "Edge", ProductCategory::Nails, u64::MAX);
        product.stock_quantity = u64::MAX - 1;
        product.tags = vec!["limited".to_string(), "gift".to_string()];
        product
    }

    fn state_of(lines: Vec<(Product, u32)>) -> CartState {
        CartState {
            lines: lines
                .into_iter()
                .map(|(product, quantity)| CartLine { product, quantity })
                .collect(),
        }
    }

    #[test]
    fn test_roundtrip_preserves_u64_extremes() {
        let state = state_of(vec![
            (extreme_product(u64::MAX), 3),
            (extreme_product(9_007_199_254_740_993), u32::MAX),
        ]);

        let text = encode(&state).unwrap();
        assert_eq!(decode(&text), state);
    }

    #[test]
    fn test_wide_fields_are_strings() {
        let state = state_of(vec![(extreme_product(u64::MAX), 1)]);
        let text = encode(&state).unwrap();

        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        let product = &value[0]["product"];
        assert_eq!(product["id"], "18446744073709551615");
        assert_eq!(product["price"], "18446744073709551615");
        assert_eq!(product["stockQuantity"], "18446744073709551614");
        assert_eq!(value[0]["quantity"], 1);
    }

    #[test]
    fn test_decode_garbage_is_empty() {
        assert!(decode("{not json").lines.is_empty());
        assert!(decode("").lines.is_empty());
        assert!(decode("{\"lines\": 3}").lines.is_empty());
    }

    #[test]
    fn test_decode_native_number_id_is_empty() {
        let text = r#"[{"product":{"id":7,"name":"x","category":"nails","price":"1",
            "stockQuantity":"1","description":"","imageUrl":"","tags":[]},"quantity":1}]"#;
        assert!(try_decode(text).is_err());
        assert!(decode(text).lines.is_empty());
    }

    #[test]
    fn test_decode_rejects_broken_invariants() {
        let product = extreme_product(1);
        let dup = state_of(vec![(product.clone(), 1), (product.clone(), 2)]);
        let text = encode(&dup).unwrap();
        assert!(matches!(try_decode(&text), Err(CommerceError::Codec(_))));

        let zero = state_of(vec![(product, 0)]);
        let text = encode(&zero).unwrap();
        assert!(decode(&text).lines.is_empty());
    }

    #[test]
    fn test_empty_cart_roundtrip() {
        let text = encode(&CartState::default()).unwrap();
        assert_eq!(text, "[]");
        assert_eq!(decode(&text), CartState::default());
    }
}
