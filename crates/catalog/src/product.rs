use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use quickbuy_core::{DomainError, DomainResult, VariantId};

/// Reference to a product image.
///
/// The `.js` endpoint emits bare URL strings; other theme payloads embed
/// objects with a `src` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ImageRef {
    Url(String),
    Object { src: String },
}

impl ImageRef {
    pub fn src(&self) -> &str {
        match self {
            ImageRef::Url(src) | ImageRef::Object { src } => src,
        }
    }
}

/// One option axis declared by a product (e.g. "Color" with its values).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawOption")]
pub struct ProductOption {
    pub name: String,
    pub values: Vec<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawOption {
    Named(String),
    Full {
        name: String,
        #[serde(default)]
        values: Vec<JsonValue>,
    },
}

impl From<RawOption> for ProductOption {
    fn from(raw: RawOption) -> Self {
        match raw {
            RawOption::Named(name) => Self {
                name,
                values: Vec::new(),
            },
            RawOption::Full { name, values } => Self {
                name,
                values: values.into_iter().filter_map(coerce_value).collect(),
            },
        }
    }
}

/// A purchasable combination of option values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawVariant")]
pub struct Variant {
    pub id: VariantId,
    pub title: String,
    /// Price in smallest currency unit (e.g., cents).
    pub price: u64,
    pub available: bool,
    /// Option values, positionally aligned with [`Product::options`].
    pub options: Vec<String>,
}

#[derive(Deserialize)]
struct RawVariant {
    id: VariantId,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    price: Option<u64>,
    #[serde(default)]
    available: Option<bool>,
    #[serde(default)]
    options: Option<Vec<JsonValue>>,
    #[serde(default)]
    option1: JsonValue,
    #[serde(default)]
    option2: JsonValue,
    #[serde(default)]
    option3: JsonValue,
}

impl From<RawVariant> for Variant {
    fn from(raw: RawVariant) -> Self {
        let values = raw
            .options
            .unwrap_or_else(|| vec![raw.option1, raw.option2, raw.option3]);

        // Positional values end at the first null (option2/option3 are null
        // for products with fewer axes).
        let options = values.into_iter().map_while(coerce_value).collect();

        Self {
            id: raw.id,
            title: raw.title.unwrap_or_default(),
            price: raw.price.unwrap_or(0),
            available: raw.available.unwrap_or(false),
            options,
        }
    }
}

impl Variant {
    /// Value of the given axis, if this variant has one.
    pub fn option(&self, axis: usize) -> Option<&str> {
        self.options.get(axis).map(String::as_str)
    }
}

/// Option values are compared as strings; numbers keep their JSON text.
fn coerce_value(value: JsonValue) -> Option<String> {
    match value {
        JsonValue::Null => None,
        JsonValue::String(s) => Some(s),
        JsonValue::Number(n) => Some(n.to_string()),
        JsonValue::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

/// Product record as served by `GET /products/{handle}.js`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub handle: Option<String>,
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    /// Lowest variant price in smallest currency unit.
    #[serde(default)]
    pub price: Option<u64>,
    #[serde(default)]
    pub images: Vec<ImageRef>,
    #[serde(default)]
    pub featured_image: Option<ImageRef>,
    #[serde(default)]
    pub options: Vec<ProductOption>,
    #[serde(default)]
    pub variants: Vec<Variant>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl Product {
    /// Decode a product from raw endpoint JSON and check its invariants.
    pub fn from_json(bytes: &[u8]) -> DomainResult<Self> {
        let product: Product = serde_json::from_slice(bytes)
            .map_err(|e| DomainError::validation(format!("product json: {e}")))?;
        product.validate()?;
        Ok(product)
    }

    /// Every variant must carry exactly one value per declared axis.
    pub fn validate(&self) -> DomainResult<()> {
        let axes = self.options.len();
        if let Some(v) = self.variants.iter().find(|v| v.options.len() != axes) {
            return Err(DomainError::validation(format!(
                "variant {} has {} option values but product declares {} axes",
                v.id,
                v.options.len(),
                axes
            )));
        }
        Ok(())
    }

    pub fn axis_count(&self) -> usize {
        self.options.len()
    }

    pub fn first_available(&self) -> Option<&Variant> {
        self.variants.iter().find(|v| v.available)
    }

    /// First available variant, else the first variant overall.
    pub fn default_variant(&self) -> Option<&Variant> {
        self.first_available().or_else(|| self.variants.first())
    }

    pub fn variant(&self, id: VariantId) -> Option<&Variant> {
        self.variants.iter().find(|v| v.id == id)
    }

    /// First image, else the featured image.
    pub fn image_url(&self) -> Option<&str> {
        self.images
            .first()
            .or(self.featured_image.as_ref())
            .map(ImageRef::src)
    }

    /// Price shown before any variant is resolved.
    pub fn display_price(&self) -> Option<u64> {
        self.default_variant().map(|v| v.price).or(self.price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEE_JSON: &str = r#"{
        "id": 7001,
        "handle": "classic-tee",
        "title": "Classic Tee",
        "description": "<p>Soft cotton.</p>",
        "price": 1999,
        "images": ["//cdn.example.com/tee.jpg"],
        "featured_image": "//cdn.example.com/tee.jpg",
        "options": [
            {"name": "Color", "position": 1, "values": ["Black", "Red"]},
            {"name": "Size", "position": 2, "values": ["Small", "Medium"]}
        ],
        "variants": [
            {"id": 1, "title": "Black / Small", "price": 1999, "available": false,
             "option1": "Black", "option2": "Small", "option3": null},
            {"id": 2, "title": "Black / Medium", "price": 2199, "available": true,
             "options": ["Black", "Medium"], "option1": "Black", "option2": "Medium", "option3": null}
        ]
    }"#;

    #[test]
    fn decodes_endpoint_payload() {
        let product = Product::from_json(TEE_JSON.as_bytes()).unwrap();
        assert_eq!(product.title, "Classic Tee");
        assert_eq!(product.axis_count(), 2);
        assert_eq!(product.options[0].values, vec!["Black", "Red"]);
        assert_eq!(product.variants[0].options, vec!["Black", "Small"]);
        assert_eq!(product.variants[1].options, vec!["Black", "Medium"]);
        assert_eq!(product.image_url(), Some("//cdn.example.com/tee.jpg"));
        assert_eq!(product.default_variant().unwrap().id, VariantId::new(2));
        assert_eq!(product.display_price(), Some(2199));
    }

    #[test]
    fn numeric_option_values_keep_their_text() {
        let json = r#"{
            "title": "Rope",
            "options": ["Length"],
            "variants": [
                {"id": 5, "price": 100, "available": true, "option1": 1.0},
                {"id": 6, "price": 100, "available": true, "option1": 1}
            ]
        }"#;
        let product = Product::from_json(json.as_bytes()).unwrap();
        assert_eq!(product.options[0].name, "Length");
        assert_eq!(product.variants[0].option(0), Some("1.0"));
        assert_eq!(product.variants[1].option(0), Some("1"));
    }

    #[test]
    fn image_objects_and_null_description_decode() {
        let json = r#"{
            "title": "Jacket",
            "description": null,
            "images": [],
            "featured_image": {"src": "https://cdn.example.com/j.png"},
            "options": [{"name": "Title", "values": ["Default Title"]}],
            "variants": [{"id": 9, "price": 5000, "available": true, "option1": "Default Title"}]
        }"#;
        let product = Product::from_json(json.as_bytes()).unwrap();
        assert_eq!(product.description, "");
        assert_eq!(product.image_url(), Some("https://cdn.example.com/j.png"));
    }

    #[test]
    fn misaligned_variant_is_rejected() {
        let json = r#"{
            "title": "Broken",
            "options": ["Color", "Size"],
            "variants": [{"id": 3, "price": 1, "available": true, "option1": "Black"}]
        }"#;
        match Product::from_json(json.as_bytes()).unwrap_err() {
            DomainError::Validation(msg) => assert!(msg.contains("variant 3")),
            other => panic!("Expected Validation error, got {other:?}"),
        }
    }

    #[test]
    fn malformed_json_is_a_validation_error() {
        assert!(matches!(
            Product::from_json(b"{\"title\": 3}"),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn empty_product_has_no_default_variant() {
        let product = Product::from_json(br#"{"title": "Ghost", "price": 500}"#).unwrap();
        assert!(product.default_variant().is_none());
        assert_eq!(product.display_price(), Some(500));
    }
}
