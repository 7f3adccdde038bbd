#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("QR_TOKEN_SECRET is not configured")]
    MissingSecret,
    #[error("invalid value for {name}: {value:?}")]
    InvalidSetting { name: &'static str, value: String },
    #[error("failed to sign identity token: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
    #[error("secure random source failed: {0}")]
    Random(#[from] rand::Error),
    #[error("failed to encode identity token as QR: {0:?}")]
    QrEncode(qrcode::types::QrError),
    #[error("{size}px image cannot hold {modules} QR modules")]
    ImageTooSmall { size: u32, modules: u32 },
    #[error("failed to write QR image: {0}")]
    Image(#[from] image::ImageError),
}
