use std::ops::Range;

use vr_core::{Element, ElementType, Error, ImageView, ImageViewMut, Result};

use crate::config::ResizeConfig;
use crate::kernels::area::{AreaElement, AreaKernel, area_2x};
use crate::kernels::bicubic::ByteBicubicKernel;
use crate::kernels::bilinear::{ByteBilinearKernel, ByteRounding, FloatBilinearKernel};
use crate::kernels::nearest::NearestKernel;
use crate::param::{ResizeParams, Variant};
use crate::tier::Tier;

/// Variant-specific state. Tables are built once and never mutated.
enum ResamplerKind {
    Nearest(NearestKernel),
    ByteBilinear(ByteBilinearKernel),
    FloatBilinear(FloatBilinearKernel),
    ByteBicubic(ByteBicubicKernel),
    Area2x,
    AreaGeneral(AreaKernel),
}

/// A resize operation bound to one geometry, element type and tier.
///
/// Built by [`create_resampler`](crate::create_resampler). Calls take `&self`
/// and allocate their own scratch rows, so one resampler may serve many
/// threads writing disjoint destinations.
pub struct Resampler {
    params: ResizeParams,
    tier: Tier,
    kind: ResamplerKind,
}

impl std::fmt::Debug for Resampler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resampler")
            .field("params", &self.params)
            .field("tier", &self.tier)
            .finish_non_exhaustive()
    }
}

impl Resampler {
    pub(crate) fn new(params: ResizeParams, tier: Tier, config: &ResizeConfig) -> Self {
        let kind = match params.variant() {
            Variant::Nearest => ResamplerKind::Nearest(NearestKernel::new(&params)),
            Variant::ByteBilinear => ResamplerKind::ByteBilinear(ByteBilinearKernel::new(
                &params,
                ByteRounding::Standard,
            )),
            Variant::ByteBilinearCompat => ResamplerKind::ByteBilinear(ByteBilinearKernel::new(
                &params,
                ByteRounding::Compat,
            )),
            Variant::ShortBilinear
            | Variant::FloatBilinear
            | Variant::HalfBilinear
            | Variant::Bf16Bilinear => ResamplerKind::FloatBilinear(FloatBilinearKernel::new(&params)),
            Variant::ByteBicubic => {
                ResamplerKind::ByteBicubic(ByteBicubicKernel::new(&params, config.cubic_a))
            }
            Variant::Area2x => ResamplerKind::Area2x,
            Variant::AreaGeneral => ResamplerKind::AreaGeneral(AreaKernel::new(&params)),
        };
        Self { params, tier, kind }
    }

    /// Geometry the resampler was built for, tagged with its tier's width.
    pub fn params(&self) -> &ResizeParams {
        &self.params
    }

    pub fn tier(&self) -> Tier {
        self.tier
    }

    /// Resizes `src` into `dst`.
    ///
    /// Both views must match the configured element type, dimensions and
    /// channel count. Every destination sample is written; row padding is
    /// left untouched.
    pub fn resample<T: Element>(
        &self,
        src: &ImageView<'_, T>,
        dst: &mut ImageViewMut<'_, T>,
    ) -> Result<()> {
        self.resample_rows(src, dst, 0..self.params.dst_height())
    }

    /// Resizes destination rows `rows` only, writing them into `dst_band`,
    /// whose row 0 receives destination row `rows.start`.
    ///
    /// Bands produce exactly the rows the whole-image call would, so disjoint
    /// bands may be processed in any order or in parallel.
    pub fn resample_rows<T: Element>(
        &self,
        src: &ImageView<'_, T>,
        dst_band: &mut ImageViewMut<'_, T>,
        rows: Range<usize>,
    ) -> Result<()> {
        self.check_element::<T>()?;
        self.check_source(src)?;
        self.check_band(dst_band, &rows)?;
        if rows.is_empty() {
            return Ok(());
        }
        self.run(src, dst_band, rows)
    }

    /// Byte-level entry point. Strides are in bytes and must be multiples of
    /// the element size; the buffers must be aligned for the element type.
    pub fn resample_bytes(
        &self,
        src: &[u8],
        src_stride: usize,
        dst: &mut [u8],
        dst_stride: usize,
    ) -> Result<()> {
        match self.params.element_type() {
            ElementType::U8 => self.resample_bytes_as::<u8>(src, src_stride, dst, dst_stride),
            ElementType::U16 => self.resample_bytes_as::<u16>(src, src_stride, dst, dst_stride),
            ElementType::F32 => self.resample_bytes_as::<f32>(src, src_stride, dst, dst_stride),
            ElementType::F16 => {
                self.resample_bytes_as::<vr_core::f16>(src, src_stride, dst, dst_stride)
            }
            ElementType::Bf16 => {
                self.resample_bytes_as::<vr_core::bf16>(src, src_stride, dst, dst_stride)
            }
        }
    }

    fn resample_bytes_as<T: Element>(
        &self,
        src: &[u8],
        src_stride: usize,
        dst: &mut [u8],
        dst_stride: usize,
    ) -> Result<()> {
        let p = &self.params;
        let src = typed_rows::<T>(src, src_stride, p.src_row_bytes(), p.src_height(), "source")?;
        let dst = typed_rows_mut::<T>(dst, dst_stride, p.dst_row_bytes(), p.dst_height())?;

        let size = size_of::<T>();
        let src = ImageView::from_slice(
            p.src_width(),
            p.src_height(),
            p.channels(),
            src_stride / size,
            src,
        )
        .map_err(|e| precondition("source", e))?;
        let mut dst = ImageViewMut::from_slice_mut(
            p.dst_width(),
            p.dst_height(),
            p.channels(),
            dst_stride / size,
            dst,
        )
        .map_err(|e| precondition("destination", e))?;
        self.resample(&src, &mut dst)
    }

    fn check_element<T: Element>(&self) -> Result<()> {
        if T::TYPE != self.params.element_type() {
            return Err(Error::PreconditionViolation(format!(
                "element type {} does not match resampler type {}",
                T::TYPE.name(),
                self.params.element_type().name()
            )));
        }
        Ok(())
    }

    fn check_source<T>(&self, src: &ImageView<'_, T>) -> Result<()> {
        let p = &self.params;
        let want = (p.src_width(), p.src_height(), p.channels());
        let got = (src.width(), src.height(), src.channels());
        if got != want {
            return Err(Error::PreconditionViolation(format!(
                "source is {}x{}x{}, expected {}x{}x{}",
                got.0, got.1, got.2, want.0, want.1, want.2
            )));
        }
        Ok(())
    }

    fn check_band<T>(&self, dst: &ImageViewMut<'_, T>, rows: &Range<usize>) -> Result<()> {
        let p = &self.params;
        if rows.start > rows.end || rows.end > p.dst_height() {
            return Err(Error::PreconditionViolation(format!(
                "rows {}..{} outside destination height {}",
                rows.start,
                rows.end,
                p.dst_height()
            )));
        }
        let want = (p.dst_width(), rows.len(), p.channels());
        let got = (dst.width(), dst.height(), dst.channels());
        if got != want {
            return Err(Error::PreconditionViolation(format!(
                "destination is {}x{}x{}, expected {}x{}x{}",
                got.0, got.1, got.2, want.0, want.1, want.2
            )));
        }
        Ok(())
    }

    fn run<T: Element>(
        &self,
        src: &ImageView<'_, T>,
        dst: &mut ImageViewMut<'_, T>,
        rows: Range<usize>,
    ) -> Result<()> {
        let lanes = self.tier.lanes();
        match &self.kind {
            ResamplerKind::Nearest(k) => k.run(src, dst, rows),
            ResamplerKind::FloatBilinear(k) => k.run(src, dst, rows, lanes),
            ResamplerKind::ByteBilinear(k) => {
                let (src, mut dst) = as_type::<T, u8>(src, dst)?;
                k.run(&src, &mut dst, rows, lanes);
            }
            ResamplerKind::ByteBicubic(k) => {
                let (src, mut dst) = as_type::<T, u8>(src, dst)?;
                k.run(&src, &mut dst, rows, lanes);
            }
            ResamplerKind::Area2x => match T::TYPE {
                ElementType::U8 => run_area::<T, u8>(src, dst, |s, d| area_2x(s, d, rows))?,
                ElementType::U16 => run_area::<T, u16>(src, dst, |s, d| area_2x(s, d, rows))?,
                ElementType::F32 => run_area::<T, f32>(src, dst, |s, d| area_2x(s, d, rows))?,
                other => return Err(no_area_path(other)),
            },
            ResamplerKind::AreaGeneral(k) => match T::TYPE {
                ElementType::U8 => run_area::<T, u8>(src, dst, |s, d| k.run(s, d, rows))?,
                ElementType::U16 => run_area::<T, u16>(src, dst, |s, d| k.run(s, d, rows))?,
                ElementType::F32 => run_area::<T, f32>(src, dst, |s, d| k.run(s, d, rows))?,
                other => return Err(no_area_path(other)),
            },
        }
        Ok(())
    }
}

/// Recovers the concrete element type behind `T` once its tag was checked.
fn as_type<'s, 'd, T: Element, U: Element>(
    src: &ImageView<'s, T>,
    dst: &'d mut ImageViewMut<'_, T>,
) -> Result<(ImageView<'s, U>, ImageViewMut<'d, U>)> {
    let mismatch = || {
        Error::PreconditionViolation(format!(
            "cannot view {} samples as {}",
            T::TYPE.name(),
            U::TYPE.name()
        ))
    };
    let src = src.reinterpret::<U>().ok_or_else(mismatch)?;
    let dst = dst.reinterpret_mut::<U>().ok_or_else(mismatch)?;
    Ok((src, dst))
}

fn run_area<T: Element, U: AreaElement>(
    src: &ImageView<'_, T>,
    dst: &mut ImageViewMut<'_, T>,
    f: impl FnOnce(&ImageView<'_, U>, &mut ImageViewMut<'_, U>),
) -> Result<()> {
    let (src, mut dst) = as_type::<T, U>(src, dst)?;
    f(&src, &mut dst);
    Ok(())
}

fn no_area_path(ty: ElementType) -> Error {
    Error::PreconditionViolation(format!("no area path for {}", ty.name()))
}

fn precondition(what: &str, err: Error) -> Error {
    Error::PreconditionViolation(format!("{what} buffer: {err}"))
}

/// Required byte length of `height` rows of `row_bytes`, the last unpadded.
fn required_len(stride: usize, row_bytes: usize, height: usize) -> Option<usize> {
    stride.checked_mul(height - 1)?.checked_add(row_bytes)
}

fn check_byte_layout<T: Element>(
    len: usize,
    stride: usize,
    row_bytes: usize,
    height: usize,
    what: &str,
) -> Result<usize> {
    if !stride.is_multiple_of(size_of::<T>()) || stride < row_bytes {
        return Err(Error::PreconditionViolation(format!(
            "{what} stride {stride} is not a multiple of {} bytes covering {row_bytes} bytes",
            size_of::<T>()
        )));
    }
    let need = required_len(stride, row_bytes, height).ok_or_else(|| {
        Error::PreconditionViolation(format!("{what} buffer size overflows"))
    })?;
    if len < need {
        return Err(Error::PreconditionViolation(format!(
            "{what} buffer holds {len} bytes, needs {need}"
        )));
    }
    Ok(need)
}

fn typed_rows<'a, T: Element>(
    bytes: &'a [u8],
    stride: usize,
    row_bytes: usize,
    height: usize,
    what: &str,
) -> Result<&'a [T]> {
    let need = check_byte_layout::<T>(bytes.len(), stride, row_bytes, height, what)?;
    bytemuck::try_cast_slice(&bytes[..need])
        .map_err(|e| Error::PreconditionViolation(format!("{what} buffer: {e}")))
}

fn typed_rows_mut<T: Element>(
    bytes: &mut [u8],
    stride: usize,
    row_bytes: usize,
    height: usize,
) -> Result<&mut [T]> {
    let need = check_byte_layout::<T>(bytes.len(), stride, row_bytes, height, "destination")?;
    bytemuck::try_cast_slice_mut(&mut bytes[..need])
        .map_err(|e| Error::PreconditionViolation(format!("destination buffer: {e}")))
}
