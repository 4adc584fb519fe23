#![allow(dead_code)]

use std::fs;
use std::path::Path;

/// A minimal 24-bit BMP. `imagesize` sniffs the header rather than the file
/// extension, so this body can sit behind a `.jpg` name.
pub fn bmp_bytes(width: u32, height: u32) -> Vec<u8> {
    let row_stride = (width * 3).div_ceil(4) * 4;
    let pixel_array_size = row_stride * height;
    let file_size = 54 + pixel_array_size;

    let mut bytes = Vec::with_capacity(file_size as usize);
    bytes.extend_from_slice(b"BM");
    bytes.extend_from_slice(&file_size.to_le_bytes());
    bytes.extend_from_slice(&[0, 0, 0, 0]);
    bytes.extend_from_slice(&54u32.to_le_bytes());

    bytes.extend_from_slice(&40u32.to_le_bytes());
    bytes.extend_from_slice(&(width as i32).to_le_bytes());
    bytes.extend_from_slice(&(height as i32).to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes());
    bytes.extend_from_slice(&24u16.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes.extend_from_slice(&pixel_array_size.to_le_bytes());
    bytes.extend_from_slice(&2835u32.to_le_bytes());
    bytes.extend_from_slice(&2835u32.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());

    bytes.resize(file_size as usize, 0);
    bytes
}

pub fn write_image(path: &Path, width: u32, height: u32) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    fs::write(path, bmp_bytes(width, height)).expect("write image file");
}

pub const PARADE_IMAGE: &str = "0--Parade/0_Parade_marchingband_1_849.jpg";
pub const EMPTY_IMAGE: &str = "0--Parade/0_Parade_Parade_0_904.jpg";
pub const MISSING_IMAGE: &str = "1--Handshaking/1_Handshaking_missing.jpg";
pub const BROKEN_IMAGE: &str = "2--Demonstration/broken.jpg";

/// Two readable images, one missing image, one unreadable image.
///
/// The zero-face record is followed by the all-zero placeholder row that the
/// real WIDER files carry; it lands at a record boundary and is reported as
/// an unexpected line.
pub const SAMPLE_ANNOTATIONS: &str = "\
0--Parade/0_Parade_marchingband_1_849.jpg
1
449 330 122 149 0 0 0 0 0 0
0--Parade/0_Parade_Parade_0_904.jpg
0
0 0 0 0 0 0 0 0 0 0
1--Handshaking/1_Handshaking_missing.jpg
2
10 10 5 5 0 0 0 0 0 0
20 20 5 5 0 0 0 0 0 0
2--Demonstration/broken.jpg
1
1 1 1 1 0 0 0 0 0 0
";

/// Lay out the images referenced by [`SAMPLE_ANNOTATIONS`] under `images`.
pub fn create_sample_images(images: &Path) {
    write_image(&images.join(PARADE_IMAGE), 1024, 683);
    write_image(&images.join(EMPTY_IMAGE), 64, 48);

    let broken = images.join(BROKEN_IMAGE);
    fs::create_dir_all(broken.parent().expect("parent")).expect("create dir");
    fs::write(broken, b"not an image").expect("write broken image");
}
