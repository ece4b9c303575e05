use super::*;
use crate::foundation::core::transparent_canvas;

#[test]
fn over_src_alpha_0_is_noop() {
    let dst = [10, 20, 30, 40];
    assert_eq!(over(dst, [255, 255, 255, 0]), dst);
}

#[test]
fn over_src_opaque_replaces_dst() {
    assert_eq!(over([0, 0, 0, 255], [255, 0, 0, 255]), [255, 0, 0, 255]);
}

#[test]
fn over_dst_transparent_returns_src() {
    let src = [100, 110, 120, 200];
    assert_eq!(over([255, 255, 255, 0], src), src);
}

#[test]
fn over_opaque_dst_stays_opaque() {
    let out = over([0, 0, 0, 255], [255, 255, 255, 128]);
    assert_eq!(out[3], 255);
    assert!((127..=129).contains(&out[0]));
}

#[test]
fn paste_over_clips_to_destination() {
    let mut dst = Canvas::from_pixel(4, 4, Rgba([0, 0, 0, 255]));
    let src = Canvas::from_pixel(3, 3, Rgba([255, 0, 0, 255]));
    paste_over(&mut dst, &src, (2, -1));
    assert_eq!(dst.get_pixel(2, 0).0, [255, 0, 0, 255]);
    assert_eq!(dst.get_pixel(3, 1).0, [255, 0, 0, 255]);
    assert_eq!(dst.get_pixel(3, 2).0, [0, 0, 0, 255]);
    assert_eq!(dst.get_pixel(1, 0).0, [0, 0, 0, 255]);
}

#[test]
fn paste_replaces_alpha() {
    let mut dst = Canvas::from_pixel(2, 2, Rgba([0, 0, 0, 255]));
    let src = transparent_canvas(1, 1);
    paste(&mut dst, &src, (1, 1));
    assert_eq!(dst.get_pixel(1, 1).0, [255, 255, 255, 0]);
    assert_eq!(dst.get_pixel(0, 0).0, [0, 0, 0, 255]);
}

#[test]
fn crop_copies_region() {
    let mut c = transparent_canvas(5, 5);
    c.put_pixel(3, 2, Rgba([1, 2, 3, 4]));
    let out = crop(&c, 2, 1, 2, 2);
    assert_eq!(out.dimensions(), (2, 2));
    assert_eq!(out.get_pixel(1, 1).0, [1, 2, 3, 4]);
}
