/// Borrowed 8-bit grayscale image, row-major.
#[derive(Clone, Copy, Debug)]
pub struct GrayImageView<'a> {
    pub width: usize,
    pub height: usize,
    pub data: &'a [u8], // row-major, len = w*h
}

/// Owned 8-bit grayscale image, row-major.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GrayImage {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
}

impl GrayImage {
    /// Image filled with a single intensity.
    pub fn filled(width: usize, height: usize, value: u8) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }

    pub fn view(&self) -> GrayImageView<'_> {
        GrayImageView {
            width: self.width,
            height: self.height,
            data: &self.data,
        }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.width + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, v: u8) {
        self.data[y * self.width + x] = v;
    }

    /// Number of pixels that are not zero.
    pub fn count_nonzero(&self) -> usize {
        self.data.iter().filter(|&&v| v != 0).count()
    }
}

impl<'a> GrayImageView<'a> {
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.width + x]
    }

    /// Copy out the axis-aligned region `[x, x+w) × [y, y+h)`, clipped to the image.
    pub fn crop(&self, x: usize, y: usize, w: usize, h: usize) -> GrayImage {
        let x1 = (x + w).min(self.width);
        let y1 = (y + h).min(self.height);
        let x0 = x.min(x1);
        let y0 = y.min(y1);
        let cw = x1 - x0;
        let ch = y1 - y0;

        let mut data = Vec::with_capacity(cw * ch);
        for yy in y0..y1 {
            let row = yy * self.width;
            data.extend_from_slice(&self.data[row + x0..row + x1]);
        }
        GrayImage {
            width: cw,
            height: ch,
            data,
        }
    }
}

#[inline]
fn get_gray(src: &GrayImageView<'_>, x: i32, y: i32) -> u8 {
    if x < 0 || y < 0 || x >= src.width as i32 || y >= src.height as i32 {
        return 0;
    }
    src.data[y as usize * src.width + x as usize]
}

/// Bilinear sample at a sub-pixel location; pixels outside the image read as 0.
#[inline]
pub fn sample_bilinear(src: &GrayImageView<'_>, x: f32, y: f32) -> f32 {
    let x0 = x.floor() as i32;
    let y0 = y.floor() as i32;
    let fx = x - x0 as f32;
    let fy = y - y0 as f32;

    let p00 = get_gray(src, x0, y0) as f32;
    let p10 = get_gray(src, x0 + 1, y0) as f32;
    let p01 = get_gray(src, x0, y0 + 1) as f32;
    let p11 = get_gray(src, x0 + 1, y0 + 1) as f32;

    let a = p00 + fx * (p10 - p00);
    let b = p01 + fx * (p11 - p01);
    a + fy * (b - a)
}

#[inline]
pub fn sample_bilinear_u8(src: &GrayImageView<'_>, x: f32, y: f32) -> u8 {
    sample_bilinear(src, x, y).round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(w: usize, h: usize) -> GrayImage {
        let data = (0..w * h).map(|i| (i % 256) as u8).collect();
        GrayImage {
            width: w,
            height: h,
            data,
        }
    }

    #[test]
    fn crop_is_clipped_to_bounds() {
        let img = ramp(10, 8);
        let roi = img.view().crop(7, 6, 5, 5);
        assert_eq!((roi.width, roi.height), (3, 2));
        assert_eq!(roi.get(0, 0), img.get(7, 6));
        assert_eq!(roi.get(2, 1), img.get(9, 7));
    }

    #[test]
    fn bilinear_hits_pixels_exactly_at_integer_coords() {
        let img = ramp(6, 6);
        let v = img.view();
        assert_eq!(sample_bilinear_u8(&v, 3.0, 2.0), img.get(3, 2));
        let mid = sample_bilinear(&v, 3.5, 2.0);
        assert!((mid - 0.5 * (img.get(3, 2) as f32 + img.get(4, 2) as f32)).abs() < 1e-4);
    }

    #[test]
    fn outside_samples_read_black() {
        let img = GrayImage::filled(4, 4, 200);
        assert_eq!(sample_bilinear_u8(&img.view(), -5.0, 1.0), 0);
    }
}
