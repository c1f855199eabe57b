//! Request-level facade: validation, rendering and reading

use crate::config::Settings;
use crate::decoder::{RqrrDecoder, SymbolDecoder};
use crate::encoder::{MatrixEncoder, QrcodeEncoder};
use crate::error::{QrError, Result};
use crate::models::{RasterImage, RenderConfig, Rgba, Style};
use crate::pipeline::DecodePipeline;
use crate::render::compositor::overlay_logo_with_ratio;
use crate::render::rasterizer::{canvas_side, rasterize};
use crate::utils::codec::{encode_png, from_base64, to_base64};
use serde::{Deserialize, Serialize};

fn default_foreground() -> String {
    "#000000".to_string()
}

fn default_background() -> String {
    "#FFFFFF".to_string()
}

/// Parameters of a render request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderRequest {
    /// Text to encode; must not be blank
    #[serde(alias = "url")]
    pub payload: String,
    /// Pixels per module; the service default applies when absent
    #[serde(default)]
    pub pixel_size: Option<u32>,
    /// Dark module color
    #[serde(default = "default_foreground")]
    pub foreground: String,
    /// Light module color
    #[serde(default = "default_background")]
    pub background: String,
    /// Base64 logo, optionally a `data:` URL
    #[serde(default)]
    pub logo_base64: Option<String>,
    /// Circle-shaped modules
    #[serde(default)]
    pub bubble: bool,
    /// Leave light areas fully transparent
    #[serde(default)]
    pub transparent_background: bool,
}

impl RenderRequest {
    /// Request with every option at its default
    pub fn new(payload: impl Into<String>) -> Self {
        Self {
            payload: payload.into(),
            pixel_size: None,
            foreground: default_foreground(),
            background: default_background(),
            logo_base64: None,
            bubble: false,
            transparent_background: false,
        }
    }
}

/// Base64 PNG produced by a render
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderResponse {
    /// Standard base64 of the PNG bytes
    pub base64_png: String,
}

/// Raw image bytes to read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadRequest {
    /// Encoded image (PNG, JPEG, ...)
    pub image: Vec<u8>,
}

/// Text recovered by a read
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadResponse {
    /// Decoded payload
    pub text: String,
}

/// Stateless render/read service. Share it freely across threads.
#[derive(Debug, Clone)]
pub struct QrService<E = QrcodeEncoder, D = RqrrDecoder> {
    settings: Settings,
    encoder: E,
    pipeline: DecodePipeline<D>,
}

impl QrService {
    /// Service over the `qrcode` encoder and `rqrr` decoder
    pub fn new(settings: Settings) -> Result<Self> {
        let encoder = QrcodeEncoder::with_quiet_zone(settings.quiet_zone);
        Self::with_collaborators(settings, encoder, RqrrDecoder::new())
    }
}

impl<E: MatrixEncoder, D: SymbolDecoder> QrService<E, D> {
    /// Service over caller-supplied collaborators
    pub fn with_collaborators(settings: Settings, encoder: E, decoder: D) -> Result<Self> {
        settings.validate()?;
        let pipeline = DecodePipeline::with_preprocess(decoder, settings.preprocess);
        Ok(Self {
            settings,
            encoder,
            pipeline,
        })
    }

    /// Active settings
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The read pipeline
    pub fn pipeline(&self) -> &DecodePipeline<D> {
        &self.pipeline
    }

    /// Validate a request into an immutable render configuration.
    ///
    /// Checks run in order: payload, colors, pixel size, logo encoding.
    pub fn render_config(&self, request: &RenderRequest) -> Result<RenderConfig> {
        if request.payload.trim().is_empty() {
            return Err(QrError::InvalidInput("payload text is required".into()));
        }

        let foreground = Rgba::parse(&request.foreground)?;
        let background = Rgba::parse(&request.background)?;
        if foreground.same_rgb(&background) && !request.transparent_background {
            tracing::warn!(
                color = %foreground,
                "foreground and background are identical, code will not be scannable"
            );
        }

        let pixel_size = request
            .pixel_size
            .unwrap_or(self.settings.default_pixel_size);
        if pixel_size == 0 || pixel_size > self.settings.max_pixel_size {
            return Err(QrError::InvalidInput(format!(
                "pixel size {} outside 1..={}",
                pixel_size, self.settings.max_pixel_size
            )));
        }

        let logo = match request.logo_base64.as_deref().map(str::trim) {
            Some(encoded) if !encoded.is_empty() => Some(
                from_base64(encoded).map_err(|e| QrError::InvalidLogoData(e.to_string()))?,
            ),
            _ => None,
        };

        let style = if request.bubble {
            Style::Bubble
        } else {
            Style::Standard
        };

        RenderConfig::new(
            pixel_size,
            style,
            foreground,
            background,
            request.transparent_background,
            logo,
        )
    }

    /// Render a request to pixels
    #[tracing::instrument(skip_all, fields(bubble = request.bubble, transparent = request.transparent_background))]
    pub fn render_image(&self, request: &RenderRequest) -> Result<RasterImage> {
        let config = self.render_config(request)?;
        let matrix = self.encoder.encode(&request.payload, self.settings.ecc_level)?;
        let side = canvas_side(matrix.size(), config.pixel_size())?;
        if side > self.settings.max_image_side {
            return Err(QrError::InvalidInput(format!(
                "{} modules at pixel size {} give a {}px image, above the {}px limit",
                matrix.size(),
                config.pixel_size(),
                side,
                self.settings.max_image_side
            )));
        }
        let raster = rasterize(&matrix, &config)?;
        overlay_logo_with_ratio(raster, config.logo(), self.settings.logo_ratio)
    }

    /// Render a request to a base64 PNG
    pub fn render(&self, request: &RenderRequest) -> Result<RenderResponse> {
        let raster = self.render_image(request)?;
        let png = encode_png(&raster)?;
        tracing::info!(
            width = raster.width(),
            png_bytes = png.len(),
            "rendered QR code"
        );
        Ok(RenderResponse {
            base64_png: to_base64(&png),
        })
    }

    /// Render a request straight to PNG bytes
    pub fn render_png(&self, request: &RenderRequest) -> Result<Vec<u8>> {
        encode_png(&self.render_image(request)?)
    }

    /// Read text from an encoded image
    #[tracing::instrument(skip_all, fields(bytes = request.image.len()))]
    pub fn read(&self, request: &ReadRequest) -> Result<ReadResponse> {
        let text = self.pipeline.decode_bytes(&request.image)?;
        tracing::info!(chars = text.chars().count(), "read QR code");
        Ok(ReadResponse { text })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> QrService {
        QrService::new(Settings::default()).unwrap()
    }

    #[test]
    fn test_blank_payload() {
        let err = service().render(&RenderRequest::new("   ")).unwrap_err();
        assert!(matches!(err, QrError::InvalidInput(_)));
    }

    #[test]
    fn test_color_checked_before_pixel_size() {
        let mut req = RenderRequest::new("hello");
        req.foreground = "notacolor".into();
        req.pixel_size = Some(0);
        assert!(matches!(
            service().render(&req),
            Err(QrError::InvalidColor(c)) if c == "notacolor"
        ));
    }

    #[test]
    fn test_pixel_size_bounds() {
        let mut req = RenderRequest::new("hello");
        req.pixel_size = Some(101);
        assert!(matches!(service().render(&req), Err(QrError::InvalidInput(_))));
        req.pixel_size = Some(0);
        assert!(matches!(service().render(&req), Err(QrError::InvalidInput(_))));
    }

    #[test]
    fn test_image_side_limit() {
        // Version 40 at Q plus the quiet zone is 185 modules, 18500px at pixel size 100
        let mut req = RenderRequest::new("a".repeat(1600));
        req.pixel_size = Some(100);
        let svc = service();
        assert!(svc.render_config(&req).is_ok());
        assert!(matches!(svc.render_image(&req), Err(QrError::InvalidInput(_))));

        let settings = Settings {
            max_image_side: 500,
            ..Settings::default()
        };
        let svc = QrService::new(settings).unwrap();
        let mut req = RenderRequest::new("hello");
        req.pixel_size = Some(20);
        assert!(matches!(svc.render(&req), Err(QrError::InvalidInput(_))));
        req.pixel_size = Some(10);
        let image = svc.render_image(&req).unwrap();
        assert!(image.width() <= 500);
    }

    #[test]
    fn test_bad_logo_base64() {
        let mut req = RenderRequest::new("hello");
        req.logo_base64 = Some("!!!not base64!!!".into());
        assert!(matches!(service().render(&req), Err(QrError::InvalidLogoData(_))));
    }

    #[test]
    fn test_default_pixel_size_applies() {
        let svc = service();
        let config = svc.render_config(&RenderRequest::new("hello")).unwrap();
        assert_eq!(config.pixel_size(), 20);
        assert_eq!(config.style(), Style::Standard);
    }

    #[test]
    fn test_request_json_shape() {
        let req: RenderRequest = serde_json::from_str(
            r##"{"url":"https://example.com","pixelSize":8,"bubble":true,"background":"#EEE"}"##,
        )
        .unwrap();
        assert_eq!(req.payload, "https://example.com");
        assert_eq!(req.pixel_size, Some(8));
        assert_eq!(req.foreground, "#000000");
        assert_eq!(req.background, "#EEE");
        assert!(req.bubble);
        assert!(!req.transparent_background);

        let body = serde_json::to_string(&RenderResponse {
            base64_png: "abc".into(),
        })
        .unwrap();
        assert_eq!(body, r#"{"base64Png":"abc"}"#);
    }
}
