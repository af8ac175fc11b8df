use async_trait::async_trait;
use log::{debug, error, info};
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use crate::error::{OpError, Result};
use crate::models::{ImageFile, NewProduct, Product, Role};
use crate::utils::{api_url, default_client};
use crate::CONFIG;

/// The REST endpoints the admin product page talks to.
#[async_trait]
pub trait ProductApi: Send + Sync {
    /// Lists the products visible to `role`.
    async fn list_products(&self, role: Role) -> Result<Vec<Product>>;
    /// Uploads an image and returns its public URL.
    async fn upload_image(&self, image: &ImageFile) -> Result<String>;
    async fn delete_image(&self, url: &str) -> Result<()>;
    async fn create_product(&self, product: &NewProduct) -> Result<()>;
    async fn delete_product(&self, id: &str) -> Result<()>;
}

#[derive(Deserialize)]
struct UploadResp {
    url: String,
}

#[derive(Clone)]
pub struct ProductService {
    addr: String,
    http_client: Client,
}

impl ProductService {
    pub const ADMIN_PRODUCTS_URL: &'static str = "/api/admin/products";
    pub const SELLER_PRODUCTS_URL: &'static str = "/api/seller/products";
    pub const PRODUCTS_URL: &'static str = "/api/products";
    pub const UPLOAD_URL: &'static str = "/api/upload";

    pub fn new(addr: &str, cookie: &str) -> Result<Self> {
        let http_client = default_client(cookie).build()?;
        Ok(Self {
            addr: addr.to_string(),
            http_client,
        })
    }

    /// Service against the server address from `config/conf.toml`.
    pub async fn from_config(cookie: &str) -> Result<Self> {
        let addr = CONFIG.read().await.server_addr();
        Self::new(addr.as_str(), cookie)
    }

    /// Admins see every product, sellers only their own.
    pub fn products_endpoint(role: Role) -> &'static str {
        if role.is_admin() {
            Self::ADMIN_PRODUCTS_URL
        } else {
            Self::SELLER_PRODUCTS_URL
        }
    }

    fn url(&self, path: &str) -> String {
        api_url(self.addr.as_str(), path)
    }
}

#[async_trait]
impl ProductApi for ProductService {
    async fn list_products(&self, role: Role) -> Result<Vec<Product>> {
        let url = self.url(Self::products_endpoint(role));
        let resp = self.http_client.get(url.as_str()).send().await?;
        if !resp.status().is_success() {
            error!("list products:{}, {}", url, resp.status().as_str());
            return Err(OpError::LoadProducts.into());
        }
        let products: Vec<Product> = resp.json().await?;
        debug!("list products:{}, count:{}", url, products.len());
        Ok(products)
    }

    async fn upload_image(&self, image: &ImageFile) -> Result<String> {
        let part = Part::bytes(image.bytes.to_vec())
            .file_name(image.file_name.clone())
            .mime_str(image.content_type.as_str())?;
        let form = Form::new().part("file", part);
        let resp = self
            .http_client
            .post(self.url(Self::UPLOAD_URL))
            .multipart(form)
            .send()
            .await?;
        if !resp.status().is_success() {
            error!("upload image:{}, {}", image.file_name, resp.status().as_str());
            return Err(OpError::UploadImage.into());
        }
        let data: UploadResp = resp.json().await?;
        info!("uploaded image {} -> {}", image.file_name, data.url);
        Ok(data.url)
    }

    async fn delete_image(&self, url: &str) -> Result<()> {
        let resp = self
            .http_client
            .delete(self.url(Self::UPLOAD_URL))
            .json(&json!({ "url": url }))
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(OpError::DeleteImage(url.to_string()).into());
        }
        Ok(())
    }

    async fn create_product(&self, product: &NewProduct) -> Result<()> {
        let resp = self
            .http_client
            .post(self.url(Self::PRODUCTS_URL))
            .json(product)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            error!("create product:{}, {}, {}", product.name, status.as_str(), body);
            return Err(OpError::CreateProduct.into());
        }
        info!("created product {}", product.name);
        Ok(())
    }

    async fn delete_product(&self, id: &str) -> Result<()> {
        let url = format!("{}/{}", self.url(Self::PRODUCTS_URL), id);
        let resp = self.http_client.delete(url.as_str()).send().await?;
        if !resp.status().is_success() {
            error!("delete product:{}, {}", id, resp.status().as_str());
            return Err(OpError::DeleteProduct.into());
        }
        info!("deleted product {}", id);
        Ok(())
    }
}
