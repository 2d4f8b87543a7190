use crate::{Element, Error};

/// Owned, tightly packed, interleaved image.
#[derive(Debug, Clone, PartialEq)]
pub struct Image<T> {
    width: usize,
    height: usize,
    channels: usize,
    data: Vec<T>,
}

impl<T> Image<T> {
    pub fn from_vec(width: usize, height: usize, channels: usize, data: Vec<T>) -> Result<Self, Error> {
        check_channels(channels)?;
        let expected = width
            .checked_mul(height)
            .and_then(|v| v.checked_mul(channels))
            .ok_or(Error::SizeMismatch {
                expected: usize::MAX,
                actual: data.len(),
            })?;

        if data.len() != expected {
            return Err(Error::SizeMismatch {
                expected,
                actual: data.len(),
            });
        }

        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn as_view(&self) -> ImageView<'_, T> {
        ImageView {
            width: self.width,
            height: self.height,
            channels: self.channels,
            stride: self.width * self.channels,
            data: &self.data,
        }
    }

    pub fn as_view_mut(&mut self) -> ImageViewMut<'_, T> {
        ImageViewMut {
            width: self.width,
            height: self.height,
            channels: self.channels,
            stride: self.width * self.channels,
            data: &mut self.data,
        }
    }
}

impl<T: Clone> Image<T> {
    pub fn new_fill(width: usize, height: usize, channels: usize, value: T) -> Self {
        assert!(channels > 0, "channel count must be non-zero");
        let len = width
            .checked_mul(height)
            .and_then(|v| v.checked_mul(channels))
            .expect("image size overflow");
        Self {
            width,
            height,
            channels,
            data: vec![value; len],
        }
    }
}

/// Borrowed image view.
///
/// `stride` is the distance, in elements, between adjacent row starts and may
/// exceed `width * channels`. The last row does not need to be padded.
#[derive(Debug, Clone, Copy)]
pub struct ImageView<'a, T> {
    width: usize,
    height: usize,
    channels: usize,
    stride: usize,
    data: &'a [T],
}

impl<'a, T> ImageView<'a, T> {
    pub fn from_slice(
        width: usize,
        height: usize,
        channels: usize,
        stride: usize,
        data: &'a [T],
    ) -> Result<Self, Error> {
        check_layout(width, height, channels, stride, data.len())?;
        Ok(Self {
            width,
            height,
            channels,
            stride,
            data,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Elements in one row, `width * channels`.
    pub fn row_len(&self) -> usize {
        self.width * self.channels
    }

    pub fn row(&self, y: usize) -> &'a [T] {
        assert!(y < self.height, "row index out of bounds");
        let start = y * self.stride;
        &self.data[start..start + self.row_len()]
    }

    /// Returns the samples of pixel `(x, y)`.
    pub fn get(&self, x: usize, y: usize) -> Option<&'a [T]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = y * self.stride + x * self.channels;
        self.data.get(idx..idx + self.channels)
    }

    pub fn subview(
        &self,
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    ) -> Result<ImageView<'a, T>, Error> {
        if x > self.width
            || y > self.height
            || width > (self.width - x)
            || height > (self.height - y)
        {
            return Err(Error::OutOfBounds);
        }

        let start = y
            .checked_mul(self.stride)
            .and_then(|v| v.checked_add(x * self.channels))
            .ok_or(Error::OutOfBounds)?;
        let min_len = min_required_len(width * self.channels, height, self.stride)
            .ok_or(Error::OutOfBounds)?;
        let tail = self.data.get(start..).ok_or(Error::OutOfBounds)?;

        if tail.len() < min_len {
            return Err(Error::OutOfBounds);
        }

        Ok(ImageView {
            width,
            height,
            channels: self.channels,
            stride: self.stride,
            data: tail,
        })
    }

    pub fn is_contiguous(&self) -> bool {
        self.stride == self.row_len()
    }

    pub fn as_contiguous_slice(&self) -> Option<&'a [T]> {
        if !self.is_contiguous() {
            return None;
        }
        let len = self.row_len() * self.height;
        self.data.get(0..len)
    }
}

impl<'a, T: Element> ImageView<'a, T> {
    /// Reinterprets the samples as another element type of the same size.
    ///
    /// Used after the runtime [`ElementType`](crate::ElementType) tag has been
    /// checked, to recover the concrete type behind a generic `T`.
    pub fn reinterpret<U: Element>(&self) -> Option<ImageView<'a, U>> {
        if size_of::<T>() != size_of::<U>() {
            return None;
        }
        let data = bytemuck::try_cast_slice(self.data).ok()?;
        Some(ImageView {
            width: self.width,
            height: self.height,
            channels: self.channels,
            stride: self.stride,
            data,
        })
    }
}

#[derive(Debug)]
pub struct ImageViewMut<'a, T> {
    width: usize,
    height: usize,
    channels: usize,
    stride: usize,
    data: &'a mut [T],
}

impl<'a, T> ImageViewMut<'a, T> {
    pub fn from_slice_mut(
        width: usize,
        height: usize,
        channels: usize,
        stride: usize,
        data: &'a mut [T],
    ) -> Result<Self, Error> {
        check_layout(width, height, channels, stride, data.len())?;
        Ok(Self {
            width,
            height,
            channels,
            stride,
            data,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn row_len(&self) -> usize {
        self.width * self.channels
    }

    pub fn row(&self, y: usize) -> &[T] {
        assert!(y < self.height, "row index out of bounds");
        let start = y * self.stride;
        &self.data[start..start + self.row_len()]
    }

    pub fn row_mut(&mut self, y: usize) -> &mut [T] {
        assert!(y < self.height, "row index out of bounds");
        let start = y * self.stride;
        let len = self.row_len();
        &mut self.data[start..start + len]
    }

    pub fn get(&self, x: usize, y: usize) -> Option<&[T]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = y * self.stride + x * self.channels;
        self.data.get(idx..idx + self.channels)
    }

    pub fn get_mut(&mut self, x: usize, y: usize) -> Option<&mut [T]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = y * self.stride + x * self.channels;
        self.data.get_mut(idx..idx + self.channels)
    }

    pub fn subview_mut(
        &mut self,
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    ) -> Result<ImageViewMut<'_, T>, Error> {
        if x > self.width
            || y > self.height
            || width > (self.width - x)
            || height > (self.height - y)
        {
            return Err(Error::OutOfBounds);
        }

        let start = y
            .checked_mul(self.stride)
            .and_then(|v| v.checked_add(x * self.channels))
            .ok_or(Error::OutOfBounds)?;
        let min_len = min_required_len(width * self.channels, height, self.stride)
            .ok_or(Error::OutOfBounds)?;

        if start > self.data.len() {
            return Err(Error::OutOfBounds);
        }
        let (_, tail) = self.data.split_at_mut(start);
        if tail.len() < min_len {
            return Err(Error::OutOfBounds);
        }

        Ok(ImageViewMut {
            width,
            height,
            channels: self.channels,
            stride: self.stride,
            data: tail,
        })
    }

    /// Splits the view into rows `[0, mid)` and `[mid, height)`.
    pub fn split_rows(self, mid: usize) -> (ImageViewMut<'a, T>, ImageViewMut<'a, T>) {
        assert!(mid <= self.height, "split row out of bounds");
        let at = (mid * self.stride).min(self.data.len());
        let (top, bottom) = self.data.split_at_mut(at);
        (
            ImageViewMut {
                width: self.width,
                height: mid,
                channels: self.channels,
                stride: self.stride,
                data: top,
            },
            ImageViewMut {
                width: self.width,
                height: self.height - mid,
                channels: self.channels,
                stride: self.stride,
                data: bottom,
            },
        )
    }

    pub fn as_view(&self) -> ImageView<'_, T> {
        ImageView {
            width: self.width,
            height: self.height,
            channels: self.channels,
            stride: self.stride,
            data: &*self.data,
        }
    }

    pub fn is_contiguous(&self) -> bool {
        self.stride == self.row_len()
    }

    pub fn as_contiguous_slice_mut(&mut self) -> Option<&mut [T]> {
        if !self.is_contiguous() {
            return None;
        }
        let len = self.row_len() * self.height;
        self.data.get_mut(0..len)
    }
}

impl<T: Element> ImageViewMut<'_, T> {
    pub fn reinterpret_mut<U: Element>(&mut self) -> Option<ImageViewMut<'_, U>> {
        if size_of::<T>() != size_of::<U>() {
            return None;
        }
        let data = bytemuck::try_cast_slice_mut(&mut *self.data).ok()?;
        Some(ImageViewMut {
            width: self.width,
            height: self.height,
            channels: self.channels,
            stride: self.stride,
            data,
        })
    }
}

fn check_channels(channels: usize) -> Result<(), Error> {
    if channels == 0 {
        return Err(Error::InvalidConfiguration("channel count must be non-zero"));
    }
    Ok(())
}

fn check_layout(
    width: usize,
    height: usize,
    channels: usize,
    stride: usize,
    len: usize,
) -> Result<(), Error> {
    check_channels(channels)?;
    let row_len = width.checked_mul(channels).ok_or(Error::InvalidStride)?;
    if stride < row_len {
        return Err(Error::InvalidStride);
    }

    let min_len = min_required_len(row_len, height, stride).ok_or(Error::SizeMismatch {
        expected: usize::MAX,
        actual: len,
    })?;

    if len < min_len {
        return Err(Error::SizeMismatch {
            expected: min_len,
            actual: len,
        });
    }
    Ok(())
}

fn min_required_len(row_len: usize, height: usize, stride: usize) -> Option<usize> {
    if row_len == 0 || height == 0 {
        return Some(0);
    }

    let rows_before_last = height.checked_sub(1)?;
    let base = rows_before_last.checked_mul(stride)?;
    base.checked_add(row_len)
}
