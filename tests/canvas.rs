use gcode_layer_sim::canvas::{CanvasError, RasterCanvas};

fn lit(canvas: &RasterCanvas) -> Vec<(i64, i64)> {
    let mut out = Vec::new();
    for y in 0..canvas.height() as i64 {
        for x in 0..canvas.width() as i64 {
            if canvas.get(x, y).unwrap() != 0 {
                out.push((x, y));
            }
        }
    }
    out
}

fn endpoints() -> Vec<(i64, i64)> {
    let mut pts = Vec::new();
    for &x in &[0, 1, 7, 19, 20, 33, 39] {
        for &y in &[0, 2, 5, 20, 31, 39] {
            pts.push((x, y));
        }
    }
    pts
}

#[test]
fn test_pixel_count_is_major_axis_length_plus_one() {
    for &(x0, y0) in &endpoints() {
        for &(x1, y1) in &endpoints() {
            let mut canvas = RasterCanvas::new(40, 40);
            canvas.draw_line(x0, y0, x1, y1, 255);
            let expected = (x1 - x0).abs().max((y1 - y0).abs()) as usize + 1;
            assert_eq!(
                canvas.lit_pixels(),
                expected,
                "({x0},{y0}) -> ({x1},{y1})"
            );
        }
    }
}

#[test]
fn test_lines_are_8_connected_and_hit_both_endpoints() {
    for &(x0, y0) in &endpoints() {
        for &(x1, y1) in &endpoints() {
            let mut canvas = RasterCanvas::new(40, 40);
            canvas.draw_line(x0, y0, x1, y1, 9);
            assert_eq!(canvas.get(x0, y0).unwrap(), 9);
            assert_eq!(canvas.get(x1, y1).unwrap(), 9);

            let pixels = lit(&canvas);
            for &(px, py) in &pixels {
                if pixels.len() == 1 {
                    break;
                }
                let has_neighbour = pixels.iter().any(|&(qx, qy)| {
                    (qx, qy) != (px, py) && (qx - px).abs() <= 1 && (qy - py).abs() <= 1
                });
                assert!(has_neighbour, "isolated pixel ({px},{py}) in ({x0},{y0}) -> ({x1},{y1})");
            }
        }
    }
}

#[test]
fn test_direction_matters() {
    let mut forward = RasterCanvas::new(8, 8);
    forward.draw_line(0, 0, 4, 2, 255);
    let mut backward = RasterCanvas::new(8, 8);
    backward.draw_line(4, 2, 0, 0, 255);
    assert_eq!(forward.lit_pixels(), backward.lit_pixels());
    assert_ne!(forward, backward);
}

#[test]
fn test_overdraw_is_idempotent() {
    let mut once = RasterCanvas::new(30, 30);
    once.draw_line(3, 4, 25, 17, 200);
    let mut twice = once.clone();
    twice.draw_line(3, 4, 25, 17, 200);
    assert_eq!(once, twice);
}

#[test]
fn test_clear_resets_every_pixel() {
    let mut canvas = RasterCanvas::new(16, 16);
    canvas.draw_line(0, 15, 15, 0, 255);
    assert!(!canvas.is_blank());
    canvas.clear();
    assert!(canvas.is_blank());
    canvas.clear();
    assert_eq!(canvas, RasterCanvas::new(16, 16));
}

#[test]
fn test_checked_access_rejects_out_of_range() {
    let mut canvas = RasterCanvas::new(4, 3);
    assert!(canvas.set(3, 2, 1).is_ok());
    assert!(matches!(canvas.get(4, 0), Err(CanvasError::OutOfRange { .. })));
    assert!(matches!(canvas.set(0, -1, 1), Err(CanvasError::OutOfRange { .. })));
}
