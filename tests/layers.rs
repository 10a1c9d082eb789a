use gcode_layer_sim::canvas::RasterCanvas;
use gcode_layer_sim::layers::{JpegExporter, LayerSink, decode, encode};

#[test]
fn test_exporter_writes_numbered_files() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("nested").join("img");
    let mut exporter = JpegExporter::create(&out, 100).unwrap();
    assert!(out.is_dir());

    let canvas = RasterCanvas::new(64, 48);
    let first = exporter.capture(&canvas, 0.2).unwrap();
    let second = exporter.capture(&canvas, 0.4).unwrap();
    assert_eq!(first.index, 0);
    assert_eq!(second.index, 1);
    assert_eq!(first.path.as_deref(), Some(out.join("layer_0_0.2.jpg").as_path()));
    assert_eq!(second.path.as_deref(), Some(out.join("layer_1_0.4.jpg").as_path()));
    assert_eq!(exporter.captured(), 2);
}

#[test]
fn test_decoded_image_matches_canvas() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("layer.jpg");

    let mut canvas = RasterCanvas::new(80, 60);
    // a thick block survives lossy compression
    for y in 20..40 {
        canvas.draw_line(20, y, 60, y, 255);
    }
    encode(&canvas, &path, 100).unwrap();

    let decoded = decode(&path).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (80, 60));
    assert!(decoded.get(40, 30).unwrap() > 200);
    assert!(decoded.get(5, 5).unwrap() < 50);
}

#[test]
fn test_decode_missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    assert!(decode(&dir.path().join("nope.jpg")).is_err());
}
