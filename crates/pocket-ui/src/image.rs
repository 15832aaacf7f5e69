//! RGBA images: PNG load/save, simple transforms and texture upload.

use pocket_fs::Vfs;
use pocket_types::backend::{RenderBackend, TextureId};
use pocket_types::color::Color;
use pocket_types::error::{PocketError, Result};

/// A texture already uploaded to the backend, with its pixel size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Icon {
    pub texture: TextureId,
    pub width: u32,
    pub height: u32,
}

/// Visible sub-rectangle of an [`Image`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Highest sequence number tried by [`save_png_sequence`].
pub const MAX_SEQUENCE: u32 = 99;

/// An RGBA8 pixel buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    viewport: Viewport,
}

impl Image {
    /// Transparent black image.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(PocketError::Image(format!("invalid size {width}x{height}")));
        }
        Ok(Self {
            width,
            height,
            pixels: vec![0; (width * height * 4) as usize],
            viewport: Viewport {
                x: 0,
                y: 0,
                width,
                height,
            },
        })
    }

    /// Wrap existing RGBA data.
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self> {
        let mut image = Self::new(width, height)?;
        if pixels.len() != image.pixels.len() {
            return Err(PocketError::Image(format!(
                "expected {} bytes for {width}x{height}, got {}",
                image.pixels.len(),
                pixels.len()
            )));
        }
        image.pixels = pixels;
        Ok(image)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Restrict the visible region. The rectangle must lie inside the image.
    pub fn set_viewport(&mut self, viewport: Viewport) -> Result<()> {
        if viewport.width == 0
            || viewport.height == 0
            || viewport.x + viewport.width > self.width
            || viewport.y + viewport.height > self.height
        {
            return Err(PocketError::Image(format!(
                "viewport {viewport:?} outside {}x{}",
                self.width, self.height
            )));
        }
        self.viewport = viewport;
        Ok(())
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        ((y * self.width + x) * 4) as usize
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = self.offset(x, y);
        let p = &self.pixels[i..i + 4];
        Some(Color::rgba(p[0], p[1], p[2], p[3]))
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, color: Color) {
        if x >= self.width || y >= self.height {
            return;
        }
        let i = self.offset(x, y);
        self.pixels[i..i + 4].copy_from_slice(&[color.r, color.g, color.b, color.a]);
    }

    /// Fill every pixel with `color`.
    pub fn clear(&mut self, color: Color) {
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&[color.r, color.g, color.b, color.a]);
        }
    }

    /// Pixels of the viewport, row by row.
    fn viewport_pixels(&self) -> Vec<u8> {
        let vp = self.viewport;
        let mut out = Vec::with_capacity((vp.width * vp.height * 4) as usize);
        for y in vp.y..vp.y + vp.height {
            let start = self.offset(vp.x, y);
            out.extend_from_slice(&self.pixels[start..start + (vp.width * 4) as usize]);
        }
        out
    }

    /// Decode a PNG of any color type into RGBA8.
    pub fn decode_png(bytes: &[u8]) -> Result<Self> {
        let mut decoder = png::Decoder::new(bytes);
        decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
        let mut reader = decoder.read_info()?;
        let mut buf = vec![0; reader.output_buffer_size()];
        let info = reader.next_frame(&mut buf)?;
        buf.truncate(info.buffer_size());

        let rgba = match info.color_type {
            png::ColorType::Rgba => buf,
            png::ColorType::Rgb => buf
                .chunks_exact(3)
                .flat_map(|p| [p[0], p[1], p[2], 0xff])
                .collect(),
            png::ColorType::Grayscale => buf.iter().flat_map(|&g| [g, g, g, 0xff]).collect(),
            png::ColorType::GrayscaleAlpha => buf
                .chunks_exact(2)
                .flat_map(|p| [p[0], p[0], p[0], p[1]])
                .collect(),
            png::ColorType::Indexed => {
                return Err(PocketError::Image("palette was not expanded".to_string()));
            },
        };
        Self::from_rgba(info.width, info.height, rgba)
    }

    /// Encode the viewport as an RGBA PNG.
    pub fn encode_png(&self) -> Result<Vec<u8>> {
        let vp = self.viewport;
        let mut out = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut out, vp.width, vp.height);
            encoder.set_color(png::ColorType::Rgba);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder.write_header()?;
            writer.write_image_data(&self.viewport_pixels())?;
        }
        Ok(out)
    }

    pub fn load_png(vfs: &dyn Vfs, path: &str) -> Result<Self> {
        let bytes = vfs.read(path)?;
        let image = Self::decode_png(&bytes)?;
        log::debug!("loaded {path} ({}x{})", image.width, image.height);
        Ok(image)
    }

    pub fn save_png(&self, vfs: &mut dyn Vfs, path: &str) -> Result<()> {
        vfs.write(path, &self.encode_png()?)
    }

    /// Half-size copy of the viewport taking every other pixel.
    pub fn thumbnail(&self) -> Result<Self> {
        let vp = self.viewport;
        let mut thumb = Self::new(vp.width / 2, vp.height / 2)?;
        for y in 0..thumb.height {
            for x in 0..thumb.width {
                let i = self.offset(vp.x + x * 2, vp.y + y * 2);
                let j = thumb.offset(x, y);
                thumb.pixels[j..j + 4].copy_from_slice(&self.pixels[i..i + 4]);
            }
        }
        Ok(thumb)
    }

    /// Copy of the viewport rotated clockwise by 0, 90, 180 or 270 degrees.
    pub fn rotate(&self, angle_cw: u32) -> Result<Self> {
        let vp = self.viewport;
        let (w, h) = match angle_cw {
            0 | 180 => (vp.width, vp.height),
            90 | 270 => (vp.height, vp.width),
            _ => return Err(PocketError::Image(format!("unsupported rotation {angle_cw}"))),
        };
        let mut out = Self::new(w, h)?;
        for y in 0..vp.height {
            for x in 0..vp.width {
                let (dx, dy) = match angle_cw {
                    90 => (vp.height - 1 - y, x),
                    180 => (vp.width - 1 - x, vp.height - 1 - y),
                    270 => (y, vp.width - 1 - x),
                    _ => (x, y),
                };
                let i = self.offset(vp.x + x, vp.y + y);
                let j = out.offset(dx, dy);
                out.pixels[j..j + 4].copy_from_slice(&self.pixels[i..i + 4]);
            }
        }
        Ok(out)
    }

    /// Replace every pixel with its gray level. Alpha is kept.
    pub fn discard_colors(&mut self) {
        for px in self.pixels.chunks_exact_mut(4) {
            let gray = Color::rgb(px[0], px[1], px[2]).gray_level();
            px[..3].fill(gray);
        }
    }

    /// 3x3 box blur; edge pixels average only their in-bounds neighbours.
    pub fn blur(&self) -> Self {
        let mut out = self.clone();
        let (w, h) = (self.width as i64, self.height as i64);
        for y in 0..h {
            for x in 0..w {
                let mut sum = [0u32; 3];
                let mut n = 0;
                for ny in (y - 1).max(0)..=(y + 1).min(h - 1) {
                    for nx in (x - 1).max(0)..=(x + 1).min(w - 1) {
                        let i = self.offset(nx as u32, ny as u32);
                        for (s, &c) in sum.iter_mut().zip(&self.pixels[i..i + 3]) {
                            *s += u32::from(c);
                        }
                        n += 1;
                    }
                }
                let j = self.offset(x as u32, y as u32);
                for (c, s) in out.pixels[j..j + 3].iter_mut().zip(sum) {
                    *c = (s / n) as u8;
                }
            }
        }
        out
    }

    /// Upload the viewport as a texture.
    pub fn upload(&self, backend: &mut dyn RenderBackend) -> Result<Icon> {
        let vp = self.viewport;
        let texture = backend.load_texture(vp.width, vp.height, &self.viewport_pixels())?;
        Ok(Icon {
            texture,
            width: vp.width,
            height: vp.height,
        })
    }

    /// Copy of what is currently on screen.
    pub fn capture(backend: &dyn RenderBackend) -> Result<Self> {
        let (w, h) = backend.screen_size();
        let pixels = backend.read_pixels(0, 0, w, h)?;
        Self::from_rgba(w, h, pixels)
    }
}

/// Save `image` as `<dir>/<name>-NN.png` using the first free NN in
/// `00..=99`. Returns the path written.
pub fn save_png_sequence(vfs: &mut dyn Vfs, dir: &str, name: &str, image: &Image) -> Result<String> {
    let sep = if dir.ends_with('/') { "" } else { "/" };
    let free = (0..=MAX_SEQUENCE)
        .map(|i| format!("{dir}{sep}{name}-{i:02}.png"))
        .find(|p| !vfs.exists(p))
        .ok_or_else(|| PocketError::Image(format!("no free slot for {name} in {dir}")))?;
    image.save_png(vfs, &free)?;
    log::info!("saved {free}");
    Ok(free)
}

/// Capture the screen and save it with [`save_png_sequence`].
pub fn save_screen_sequence(
    backend: &dyn RenderBackend,
    vfs: &mut dyn Vfs,
    dir: &str,
    name: &str,
) -> Result<String> {
    let image = Image::capture(backend)?;
    save_png_sequence(vfs, dir, name, &image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MockBackend;
    use pocket_fs::{HostVfs, MemoryVfs};

    fn gradient(w: u32, h: u32) -> Image {
        let mut img = Image::new(w, h).unwrap();
        for y in 0..h {
            for x in 0..w {
                img.set_pixel(x, y, Color::rgba(x as u8, y as u8, (x + y) as u8, 0xff));
            }
        }
        img
    }

    #[test]
    fn zero_size_is_rejected() {
        assert!(matches!(Image::new(0, 4), Err(PocketError::Image(_))));
        assert!(Image::from_rgba(2, 2, vec![0; 3]).is_err());
    }

    #[test]
    fn clear_fills_every_pixel() {
        let mut img = Image::new(3, 2).unwrap();
        img.clear(Color::RED);
        assert!(img.pixels().chunks(4).all(|p| p == [255, 0, 0, 255]));
    }

    #[test]
    fn png_survives_a_trip_through_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut vfs = HostVfs::new(dir.path());
        let img = gradient(5, 3);
        img.save_png(&mut vfs, "/shot.png").unwrap();
        let back = Image::load_png(&vfs, "/shot.png").unwrap();
        assert_eq!(back.pixels(), img.pixels());
        assert_eq!((back.width(), back.height()), (5, 3));
    }

    #[test]
    fn garbage_is_an_image_error() {
        assert!(matches!(
            Image::decode_png(b"definitely not a png"),
            Err(PocketError::Image(_))
        ));
    }

    #[test]
    fn viewport_limits_what_is_encoded() {
        let mut img = gradient(6, 6);
        img.set_viewport(Viewport {
            x: 2,
            y: 1,
            width: 3,
            height: 2,
        })
        .unwrap();
        let back = Image::decode_png(&img.encode_png().unwrap()).unwrap();
        assert_eq!((back.width(), back.height()), (3, 2));
        assert_eq!(back.pixel(0, 0), img.pixel(2, 1));
        assert!(img
            .set_viewport(Viewport {
                x: 4,
                y: 0,
                width: 3,
                height: 1
            })
            .is_err());
    }

    #[test]
    fn thumbnail_takes_every_other_pixel() {
        let img = gradient(8, 6);
        let t = img.thumbnail().unwrap();
        assert_eq!((t.width(), t.height()), (4, 3));
        assert_eq!(t.pixel(1, 2), img.pixel(2, 4));
    }

    #[test]
    fn rotation_moves_corners_clockwise() {
        let img = gradient(4, 2);
        let r = img.rotate(90).unwrap();
        assert_eq!((r.width(), r.height()), (2, 4));
        // top-left goes to top-right
        assert_eq!(r.pixel(1, 0), img.pixel(0, 0));
        let r = img.rotate(180).unwrap();
        assert_eq!(r.pixel(3, 1), img.pixel(0, 0));
        let r = img.rotate(270).unwrap();
        assert_eq!(r.pixel(0, 3), img.pixel(0, 0));
        assert_eq!(img.rotate(0).unwrap(), img);
        assert!(img.rotate(45).is_err());
    }

    #[test]
    fn four_quarter_turns_are_identity() {
        let img = gradient(5, 3);
        let mut r = img.clone();
        for _ in 0..4 {
            r = r.rotate(90).unwrap();
        }
        assert_eq!(r, img);
    }

    #[test]
    fn discarding_colors_uses_weighted_gray() {
        let mut img = Image::new(1, 1).unwrap();
        img.set_pixel(0, 0, Color::rgba(90, 0, 0, 7));
        img.discard_colors();
        assert_eq!(img.pixel(0, 0), Some(Color::rgba(30, 30, 30, 7)));
    }

    #[test]
    fn blur_averages_neighbours() {
        let mut img = Image::new(3, 3).unwrap();
        img.set_pixel(1, 1, Color::rgb(90, 90, 90));
        let b = img.blur();
        assert_eq!(b.pixel(1, 1).map(|c| c.r), Some(10));
        // corner sees 4 pixels
        assert_eq!(b.pixel(0, 0).map(|c| c.r), Some(22));
    }

    #[test]
    fn upload_reports_viewport_size() {
        let mut backend = MockBackend::new();
        let icon = gradient(7, 4).upload(&mut backend).unwrap();
        assert_eq!((icon.width, icon.height), (7, 4));
    }

    #[test]
    fn sequence_uses_first_free_slot() {
        let mut vfs = MemoryVfs::with_tree(&[("/shots/", "")]).unwrap();
        vfs.write("/shots/game-00.png", b"taken").unwrap();
        let img = gradient(2, 2);
        let path = save_png_sequence(&mut vfs, "/shots", "game", &img).unwrap();
        assert_eq!(path, "/shots/game-01.png");
        let again = save_png_sequence(&mut vfs, "/shots/", "game", &img).unwrap();
        assert_eq!(again, "/shots/game-02.png");
    }

    #[test]
    fn sequence_fails_when_full() {
        let mut vfs = MemoryVfs::with_tree(&[("/s/", "")]).unwrap();
        for i in 0..=MAX_SEQUENCE {
            vfs.write(&format!("/s/x-{i:02}.png"), b"").unwrap();
        }
        assert!(matches!(
            save_png_sequence(&mut vfs, "/s", "x", &gradient(1, 1)),
            Err(PocketError::Image(_))
        ));
    }

    #[test]
    fn screen_sequence_captures_backend() {
        let mut vfs = MemoryVfs::with_tree(&[("/s/", "")]).unwrap();
        let backend = MockBackend::new();
        let path = save_screen_sequence(&backend, &mut vfs, "/s", "screen").unwrap();
        let img = Image::load_png(&vfs, &path).unwrap();
        assert_eq!((img.width(), img.height()), backend.screen_size());
    }
}
