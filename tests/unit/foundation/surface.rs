use super::*;

fn numbered(len: usize) -> Vec<u32> {
    (0..len as u32).collect()
}

#[test]
fn new_rejects_stride_below_width() {
    let px = numbered(16);
    let err = Surface::new(&px, 4, 2, 3).unwrap_err();
    assert!(err.to_string().contains("stride"));
}

#[test]
fn new_rejects_short_buffer() {
    let px = numbered(7);
    assert!(Surface::new(&px, 4, 2, 4).is_err());
    // Last row only needs `width` pixels.
    let px = numbered(9);
    assert!(Surface::new(&px, 4, 2, 5).is_ok());
}

#[test]
fn zero_sized_surface_accepts_empty_buffer() {
    let s = Surface::new(&[], 0, 10, 0).unwrap();
    assert!(s.extent().is_empty());
    assert!(s.row(3).is_empty());
}

#[test]
fn pixel_addresses_rows_by_stride() {
    let px = numbered(12);
    let s = Surface::new(&px, 3, 2, 6).unwrap();
    assert_eq!(s.pixel(0, 0), 0);
    assert_eq!(s.pixel(2, 1), 8);
    assert_eq!(s.row(1), &[6, 7, 8]);
}

#[test]
fn sub_offsets_into_parent_and_keeps_stride() {
    let px = numbered(20);
    let s = Surface::packed(&px, 5, 4).unwrap();
    let sub = s.sub(1, 2, 2, 2);
    assert_eq!(sub.extent(), Extent::new(2, 2));
    assert_eq!(sub.stride(), 5);
    assert_eq!(sub.row(0), &[11, 12]);
    assert_eq!(sub.row(1), &[16, 17]);
}

#[test]
fn sub_clips_to_parent_remaining_extent() {
    let px = numbered(20);
    let s = Surface::packed(&px, 5, 4).unwrap();
    let sub = s.sub(3, 1, 10, 10);
    assert_eq!(sub.extent(), Extent::new(2, 3));
    assert_eq!(sub.pixel(1, 2), 19);
}

#[test]
fn sub_fully_outside_is_empty() {
    let px = numbered(20);
    let s = Surface::packed(&px, 5, 4).unwrap();
    assert_eq!(s.sub(9, 0, 3, 3).extent(), Extent::new(0, 3));
    assert!(s.sub(9, 0, 3, 3).extent().is_empty());
    assert!(s.sub(0, 4, 3, 3).extent().is_empty());
    assert!(s.sub(u16::MAX, u16::MAX, u16::MAX, u16::MAX).extent().is_empty());
}

#[test]
fn sub_mut_writes_through_to_parent() {
    let mut px = vec![0u32; 16];
    {
        let mut s = SurfaceMut::packed(&mut px, 4, 4).unwrap();
        let mut sub = s.sub_mut(2, 2, 2, 2);
        sub.fill(7);
    }
    let sevens: Vec<usize> = px
        .iter()
        .enumerate()
        .filter(|(_, v)| **v == 7)
        .map(|(i, _)| i)
        .collect();
    assert_eq!(sevens, vec![10, 11, 14, 15]);
}

#[test]
fn overlap_takes_min_width_and_min_height() {
    let e = overlap([Extent::new(5, 2), Extent::new(3, 9), Extent::new(4, 4)]);
    assert_eq!(e, Extent::new(3, 2));
}

#[test]
fn crop_to_only_shrinks() {
    let px = numbered(6);
    let mut s = Surface::packed(&px, 3, 2).unwrap();
    s.crop_to(Extent::new(10, 1));
    assert_eq!(s.extent(), Extent::new(3, 1));
}

#[test]
fn copy_from_copies_overlap_only() {
    let src_px = numbered(9);
    let src = Surface::packed(&src_px, 3, 3).unwrap();
    let mut dst_px = vec![100u32; 4];
    let mut dst = SurfaceMut::packed(&mut dst_px, 4, 1).unwrap();
    dst.copy_from(&src);
    assert_eq!(dst_px, vec![0, 1, 2, 100]);
}

#[test]
fn binary_into_backdrop_reads_before_write() {
    let src_px = vec![1u32, 2, 3, 4];
    let src = Surface::packed(&src_px, 2, 2).unwrap();
    let mut bd_px = vec![10u32, 20, 30, 40];
    let mut bd = SurfaceMut::packed(&mut bd_px, 2, 2).unwrap();
    let extent = Binary::IntoBackdrop {
        src,
        backdrop: &mut bd,
    }
    .run(|s, b| s + b);
    assert_eq!(extent, Extent::new(2, 2));
    assert_eq!(bd_px, vec![11, 22, 33, 44]);
}
