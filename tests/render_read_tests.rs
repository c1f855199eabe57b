//! End-to-end tests for rendering and reading
//!
//! These go through the public service surface with the real `qrcode`
//! encoder and `rqrr` decoder, plus a counting decoder to observe how many
//! attempts the read pipeline makes.

use image::{DynamicImage, Rgba as Px, RgbaImage};
use qr_forge::encoder::{MatrixEncoder, QrcodeEncoder};
use qr_forge::render::LogoPlacement;
use qr_forge::utils::codec::{encode_png, from_base64, to_base64};
use qr_forge::{
    DecodeAttemptResult, DecodeConfig, EccLevel, QrError, QrService, ReadRequest, RenderRequest,
    Settings, SymbolDecoder,
};
use rstest::rstest;
use std::sync::atomic::{AtomicUsize, Ordering};

const URL: &str = "https://example.com";

fn service() -> QrService {
    QrService::new(Settings::default()).expect("default settings are valid")
}

fn matrix_size(payload: &str) -> u32 {
    QrcodeEncoder::new()
        .encode(payload, EccLevel::Q)
        .expect("payload encodes")
        .size() as u32
}

/// Counts calls and answers from a fixed script
struct CountingDecoder {
    calls: AtomicUsize,
    script: Vec<Option<&'static str>>,
}

impl CountingDecoder {
    fn new(script: Vec<Option<&'static str>>) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            script,
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl SymbolDecoder for CountingDecoder {
    fn decode(&self, _image: &DynamicImage, _config: &DecodeConfig) -> Option<String> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        self.script.get(n).copied().flatten().map(String::from)
    }
}

fn counting_service(script: Vec<Option<&'static str>>) -> QrService<QrcodeEncoder, CountingDecoder> {
    QrService::with_collaborators(
        Settings::default(),
        QrcodeEncoder::new(),
        CountingDecoder::new(script),
    )
    .expect("default settings are valid")
}

fn png_bytes() -> Vec<u8> {
    encode_png(&RgbaImage::from_pixel(16, 16, Px([255, 255, 255, 255]))).unwrap()
}

#[test]
fn test_standard_round_trip() {
    let svc = service();
    let mut request = RenderRequest::new(URL);
    request.pixel_size = Some(20);

    let response = svc.render(&request).unwrap();
    let png = from_base64(&response.base64_png).unwrap();
    let read = svc.read(&ReadRequest { image: png }).unwrap();
    assert_eq!(read.text, URL);
}

#[test]
fn test_recolored_round_trip() {
    let svc = service();
    let mut request = RenderRequest::new(URL);
    request.pixel_size = Some(8);
    request.foreground = "#1A237E".into();
    request.background = "#FFF8E1".into();

    let png = svc.render_png(&request).unwrap();
    assert_eq!(svc.read(&ReadRequest { image: png }).unwrap().text, URL);
}

#[test]
fn test_transparent_standard_round_trip() {
    let svc = service();
    let mut request = RenderRequest::new(URL);
    request.pixel_size = Some(10);
    request.transparent_background = true;

    let png = svc.render_png(&request).unwrap();
    assert_eq!(svc.read(&ReadRequest { image: png }).unwrap().text, URL);
}

#[rstest]
#[case(4, false)]
#[case(4, true)]
#[case(8, false)]
#[case(8, true)]
#[case(20, false)]
#[case(20, true)]
fn test_bubble_round_trip(#[case] pixel_size: u32, #[case] transparent: bool) {
    let svc = service();
    let mut request = RenderRequest::new(URL);
    request.pixel_size = Some(pixel_size);
    request.bubble = true;
    request.transparent_background = transparent;

    let png = svc.render_png(&request).unwrap();
    assert_eq!(svc.read(&ReadRequest { image: png.clone() }).unwrap().text, URL);

    let image = image::load_from_memory(&png).unwrap();
    let report = svc.pipeline().run(&image);
    assert_eq!(report.result, DecodeAttemptResult::Text(URL.to_string()));
    assert_eq!(report.attempts, 1);
    assert!(!report.preprocessed);
}

#[rstest]
#[case(1, false)]
#[case(3, false)]
#[case(20, false)]
#[case(1, true)]
#[case(7, true)]
fn test_dimensions_follow_pixel_size(#[case] pixel_size: u32, #[case] bubble: bool) {
    let mut request = RenderRequest::new(URL);
    request.pixel_size = Some(pixel_size);
    request.bubble = bubble;

    let image = service().render_image(&request).unwrap();
    let side = matrix_size(URL) * pixel_size;
    assert_eq!(image.dimensions(), (side, side));
}

#[test]
fn test_standard_pixels_are_pure() {
    let mut request = RenderRequest::new(URL);
    request.pixel_size = Some(5);
    request.foreground = "#FF0000".into();
    request.background = "#00FF00".into();

    let image = service().render_image(&request).unwrap();
    assert!(
        image
            .pixels()
            .all(|p| p.0 == [255, 0, 0, 255] || p.0 == [0, 255, 0, 255])
    );
}

#[test]
fn test_bubble_transparent_alpha() {
    let ps = 20;
    let mut request = RenderRequest::new(URL);
    request.pixel_size = Some(ps);
    request.bubble = true;
    request.transparent_background = true;

    let matrix = QrcodeEncoder::new().encode(URL, EccLevel::Q).unwrap();
    let image = service().render_image(&request).unwrap();

    for my in 0..matrix.size() {
        for mx in 0..matrix.size() {
            let (x0, y0) = (mx as u32 * ps, my as u32 * ps);
            let center = image.get_pixel(x0 + ps / 2, y0 + ps / 2).0[3];
            let corner = image.get_pixel(x0, y0).0[3];
            if matrix.get(mx, my) {
                assert_eq!(center, 255, "dark module ({mx}, {my})");
            } else {
                assert_eq!(center, 0, "light module ({mx}, {my})");
            }
            // Circle never reaches the cell corner
            assert_eq!(corner, 0, "module corner ({mx}, {my})");
        }
    }
}

#[test]
fn test_rendering_is_deterministic() {
    let svc = service();
    let mut request = RenderRequest::new(URL);
    request.bubble = true;
    request.foreground = "#336699".into();
    let a = svc.render(&request).unwrap();
    let b = svc.render(&request).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_malformed_color() {
    let mut request = RenderRequest::new(URL);
    request.background = "notacolor".into();
    match service().render(&request) {
        Err(QrError::InvalidColor(value)) => assert_eq!(value, "notacolor"),
        other => panic!("expected InvalidColor, got {other:?}"),
    }
}

#[test]
fn test_logo_centered_and_opaque() {
    let logo = encode_png(&RgbaImage::from_pixel(9, 9, Px([0, 0, 255, 255]))).unwrap();
    let mut request = RenderRequest::new(URL);
    request.pixel_size = Some(10);
    request.logo_base64 = Some(format!("data:image/png;base64,{}", to_base64(&logo)));

    let image = service().render_image(&request).unwrap();
    let (w, h) = image.dimensions();
    let placement = LogoPlacement::centered(w, h, 5).unwrap();
    assert_eq!(placement.size, w / 5);
    assert_eq!(placement.x, (w - placement.size) / 2);
    assert_eq!(placement.y, (h - placement.size) / 2);

    for y in placement.y..placement.y + placement.size {
        for x in placement.x..placement.x + placement.size {
            assert_eq!(image.get_pixel(x, y).0, [0, 0, 255, 255]);
        }
    }
    // Just outside the overlay is still code
    let outside = image.get_pixel(placement.x - 1, placement.y).0;
    assert_ne!(outside, [0, 0, 255, 255]);
}

#[test]
fn test_logo_round_trip_at_q() {
    let logo = encode_png(&RgbaImage::from_pixel(4, 4, Px([200, 30, 30, 255]))).unwrap();
    let svc = service();
    let mut request = RenderRequest::new(URL);
    request.pixel_size = Some(10);
    request.logo_base64 = Some(to_base64(&logo));

    let png = svc.render_png(&request).unwrap();
    assert_eq!(svc.read(&ReadRequest { image: png }).unwrap().text, URL);
}

#[test]
fn test_undecodable_logo() {
    let mut request = RenderRequest::new(URL);
    request.logo_base64 = Some(to_base64(b"plain text, not an image"));
    assert!(matches!(
        service().render(&request),
        Err(QrError::InvalidLogoData(_))
    ));
}

#[test]
fn test_empty_image_never_decoded() {
    let svc = counting_service(vec![Some("unused")]);
    let err = svc.read(&ReadRequest { image: Vec::new() }).unwrap_err();
    assert!(matches!(err, QrError::InvalidInput(_)));
    assert_eq!(svc.pipeline().decoder().calls(), 0);
}

#[test]
fn test_raw_success_single_call() {
    let svc = counting_service(vec![Some("first")]);
    let text = svc.read(&ReadRequest { image: png_bytes() }).unwrap().text;
    assert_eq!(text, "first");
    assert_eq!(svc.pipeline().decoder().calls(), 1);
}

#[test]
fn test_fallback_success_two_calls() {
    let svc = counting_service(vec![None, Some("second")]);
    let text = svc.read(&ReadRequest { image: png_bytes() }).unwrap().text;
    assert_eq!(text, "second");
    assert_eq!(svc.pipeline().decoder().calls(), 2);
}

#[test]
fn test_not_found_after_two_calls() {
    let svc = counting_service(vec![None, None, Some("too late")]);
    let err = svc.read(&ReadRequest { image: png_bytes() }).unwrap_err();
    assert!(matches!(err, QrError::SymbolNotFound));
    assert!(err.is_client_error());
    assert_eq!(svc.pipeline().decoder().calls(), 2);
}

#[test]
fn test_blank_image_not_found_with_real_decoder() {
    let err = service()
        .read(&ReadRequest { image: png_bytes() })
        .unwrap_err();
    assert!(matches!(err, QrError::SymbolNotFound));
}

#[test]
fn test_inverted_symbol_is_read() {
    let svc = service();
    let mut request = RenderRequest::new(URL);
    request.pixel_size = Some(8);
    request.foreground = "#FFFFFF".into();
    request.background = "#000000".into();

    let png = svc.render_png(&request).unwrap();
    assert_eq!(svc.read(&ReadRequest { image: png }).unwrap().text, URL);
}

#[test]
fn test_concurrent_requests() {
    let svc = service();
    std::thread::scope(|scope| {
        for i in 0..4 {
            let svc = &svc;
            scope.spawn(move || {
                let payload = format!("{URL}/{i}");
                let mut request = RenderRequest::new(payload.clone());
                request.pixel_size = Some(6);
                let png = svc.render_png(&request).unwrap();
                assert_eq!(svc.read(&ReadRequest { image: png }).unwrap().text, payload);
            });
        }
    });
}
