use reqwest::Error as RequestError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, StorefrontError>;

// 页面上没有具体错误信息时显示的提示
pub const FALLBACK_MESSAGE: &'static str = "Something went wrong";

#[derive(Error, Debug)]
pub enum StorefrontError {
    #[error(transparent)]
    // 发起http请求时报的错误
    RequestError(#[from] RequestError),

    #[error(transparent)]
    // 业务上的错误
    OpError(#[from] OpError),

    #[error(transparent)]
    // 读写本地存储时的错误
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    SerdeJsonError(#[from] serde_json::Error),

    #[error(transparent)]
    // addr 不是合法的 url
    UrlError(#[from] url::ParseError),

    #[error(transparent)]
    // 配置文件格式错误
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    // session token 校验失败
    TokenError(#[from] jsonwebtoken::errors::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StorefrontError {
    /// The single line shown to the user when an operation fails.
    pub fn user_message(&self) -> String {
        let msg = self.to_string();
        if msg.trim().is_empty() {
            FALLBACK_MESSAGE.to_string()
        } else {
            msg
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum OpError {
    #[error("Failed to load products")]
    LoadProducts,

    #[error("Image upload failed")]
    UploadImage,

    #[error("Failed to create product")]
    CreateProduct,

    #[error("Failed to delete product")]
    DeleteProduct,

    #[error("Failed to delete image {0}")]
    DeleteImage(String),

    #[error("Failed to load session")]
    LoadSession,

    #[error("Invalid price: {0}")]
    InvalidPrice(String),

    #[error("Invalid stock: {0}")]
    InvalidStock(String),

    #[error("Please fill in the {0} field")]
    MissingField(&'static str),

    #[error("{0}")]
    Message(String),
}
