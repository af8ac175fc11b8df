use log::{info, warn};

use crate::error::Result;
use crate::models::{Product, ProductForm, Role, SessionStatus};
use crate::services::ProductApi;
use crate::ui::AdminMessage;

/// Admin/seller product management: the "add product" form plus the list of
/// existing products.
pub struct ProductsAdminPage<A: ProductApi> {
    api: A,
    status: SessionStatus,
    pub products: Vec<Product>,
    pub loading: bool,
    // 空字符串表示没有错误
    pub error: String,
    pub form: ProductForm,
    pub uploading: bool,
    pub redirect: Option<String>,
}

impl<A: ProductApi> ProductsAdminPage<A> {
    pub const LOGIN_URL: &'static str = "/auth/login";

    pub fn new(api: A) -> Self {
        Self {
            api,
            status: SessionStatus::Loading,
            products: vec![],
            loading: true,
            error: String::new(),
            form: ProductForm::default(),
            uploading: false,
            redirect: None,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn status(&self) -> &SessionStatus {
        &self.status
    }

    /// Runs whenever the session status changes. Anonymous visitors are sent
    /// to the login page before anything is fetched.
    pub async fn mount(&mut self, status: SessionStatus) {
        self.status = status;
        match self.status {
            SessionStatus::Unauthenticated => {
                info!("not signed in, redirect to {}", Self::LOGIN_URL);
                self.redirect = Some(Self::LOGIN_URL.to_string());
            }
            SessionStatus::Authenticated(_) => self.fetch_products().await,
            SessionStatus::Loading => {}
        }
    }

    fn role(&self) -> Role {
        self.status.session().map(|s| s.role()).unwrap_or(Role::User)
    }

    pub async fn fetch_products(&mut self) {
        self.loading = true;
        match self.api.list_products(self.role()).await {
            Ok(products) => self.products = products,
            Err(e) => self.error = e.user_message(),
        }
        self.loading = false;
    }

    pub async fn submit(&mut self) {
        self.error.clear();
        self.uploading = true;
        if let Err(e) = self.create_product().await {
            self.error = e.user_message();
        }
        self.uploading = false;
    }

    async fn create_product(&mut self) -> Result<()> {
        self.form.check()?;
        // 先解析价格和库存, 避免图片传上去了商品却建不了
        let mut product = self.form.to_new_product(String::new())?;
        if let Some(ref image) = self.form.image_file {
            product.image_url = self.api.upload_image(image).await?;
        }
        self.api.create_product(&product).await?;
        self.form = ProductForm::default();
        self.fetch_products().await;
        Ok(())
    }

    /// Deletes the product, then tries to delete its image. The image is
    /// best effort: a failure there is only logged.
    pub async fn delete_product(&mut self, id: &str, image_url: &str, confirmed: bool) {
        if !confirmed {
            return;
        }
        if let Err(e) = self.api.delete_product(id).await {
            self.error = e.user_message();
            return;
        }
        if !image_url.is_empty() {
            if let Err(e) = self.api.delete_image(image_url).await {
                warn!("image of product {} not deleted: {}", id, e);
            }
        }
        self.fetch_products().await;
    }

    pub async fn update(&mut self, message: AdminMessage) {
        match message {
            AdminMessage::NameInput(v) => self.form.name = v,
            AdminMessage::DescriptionInput(v) => self.form.description = v,
            AdminMessage::PriceInput(v) => self.form.price = v,
            AdminMessage::ImageSelected(file) => self.form.image_file = Some(file),
            AdminMessage::CategoryInput(v) => self.form.category = v,
            AdminMessage::SizeInput(v) => self.form.size = v,
            AdminMessage::ColorInput(v) => self.form.color = v,
            AdminMessage::StockInput(v) => self.form.stock = v,
            AdminMessage::Submit => self.submit().await,
            AdminMessage::Delete {
                id,
                image_url,
                confirmed,
            } => self.delete_product(id.as_str(), image_url.as_str(), confirmed).await,
            AdminMessage::Refresh => self.fetch_products().await,
        }
    }
}
