use std::path::Path;
use std::str::FromStr;

use bytes::Bytes;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{OpError, Result};

/// Product record as returned by the admin/seller listing endpoints.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub stock: i64,
    #[serde(default)]
    pub seller_id: String,
}

/// Body of `POST /api/products`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub image_url: String,
    pub category: String,
    pub size: String,
    pub color: String,
    pub stock: i64,
}

/// An image picked in the form, uploaded as the multipart `file` field.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl ImageFile {
    pub fn new<N: Into<String>, B: Into<Bytes>>(file_name: N, bytes: B) -> Self {
        let file_name = file_name.into();
        let content_type = Self::guess_content_type(&file_name).to_string();
        Self {
            file_name,
            content_type,
            bytes: bytes.into(),
        }
    }

    pub async fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        Ok(Self::new(file_name, bytes))
    }

    fn guess_content_type(file_name: &str) -> &'static str {
        let ext = file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "png" => "image/png",
            "jpg" | "jpeg" => "image/jpeg",
            "gif" => "image/gif",
            "webp" => "image/webp",
            "svg" => "image/svg+xml",
            _ => "application/octet-stream",
        }
    }
}

/// Raw form state of the "add product" form. Price and stock stay text
/// until submit, the way the inputs hold them.
#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct ProductForm {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub description: String,
    #[validate(length(min = 1))]
    pub price: String,
    pub image_file: Option<ImageFile>,
    #[validate(length(min = 1))]
    pub category: String,
    #[validate(length(min = 1))]
    pub size: String,
    #[validate(length(min = 1))]
    pub color: String,
    #[validate(length(min = 1))]
    pub stock: String,
}

impl ProductForm {
    const FIELD_ORDER: [&'static str; 7] =
        ["name", "description", "price", "category", "size", "color", "stock"];

    /// Required-field check; reports the first empty field in form order.
    pub fn check(&self) -> Result<()> {
        if let Err(errors) = self.validate() {
            let fields = errors.field_errors();
            for name in Self::FIELD_ORDER.iter() {
                if fields.contains_key(name) {
                    return Err(OpError::MissingField(*name).into());
                }
            }
            return Err(OpError::Message(errors.to_string()).into());
        }
        Ok(())
    }

    pub fn parse_price(&self) -> Result<Decimal> {
        let raw = self.price.trim();
        match Decimal::from_str(raw) {
            Ok(price) if !price.is_sign_negative() => Ok(price),
            _ => Err(OpError::InvalidPrice(raw.to_string()).into()),
        }
    }

    pub fn parse_stock(&self) -> Result<i64> {
        let raw = self.stock.trim();
        match raw.parse::<i64>() {
            Ok(stock) if stock >= 0 => Ok(stock),
            _ => Err(OpError::InvalidStock(raw.to_string()).into()),
        }
    }

    /// Builds the creation payload once the image (if any) has a URL.
    pub fn to_new_product(&self, image_url: String) -> Result<NewProduct> {
        Ok(NewProduct {
            name: self.name.clone(),
            description: self.description.clone(),
            price: self.parse_price()?,
            image_url,
            category: self.category.clone(),
            size: self.size.clone(),
            color: self.color.clone(),
            stock: self.parse_stock()?,
        })
    }
}
