use vr_core::{ElementType, Error, Result};

/// Resampling algorithm requested by the caller.
///
/// The discriminants double as the integer codes used by the C handle API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u32)]
pub enum Method {
    Nearest = 0,
    Bilinear = 1,
    /// Bilinear with OpenCV-style pixel mapping and fixed-point rounding.
    BilinearCompat = 2,
    Bicubic = 3,
    Area = 4,
}

impl Method {
    pub const ALL: [Method; 5] = [
        Self::Nearest,
        Self::Bilinear,
        Self::BilinearCompat,
        Self::Bicubic,
        Self::Area,
    ];

    pub const fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(Self::Nearest),
            1 => Some(Self::Bilinear),
            2 => Some(Self::BilinearCompat),
            3 => Some(Self::Bicubic),
            4 => Some(Self::Area),
            _ => None,
        }
    }
}

/// The concrete execution strategy implied by a (method, element type,
/// geometry) triple. Exactly one applies to every valid [`ResizeParams`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    Nearest,
    ByteBilinear,
    ByteBilinearCompat,
    ShortBilinear,
    FloatBilinear,
    HalfBilinear,
    Bf16Bilinear,
    ByteBicubic,
    /// Exact 2:1 box in both axes.
    Area2x,
    AreaGeneral,
}

/// Validated resize geometry.
///
/// `align` is the vector width, in bytes, of the capability tier the
/// parameters were resolved for; it is `1` until the dispatcher picks a tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResizeParams {
    src_width: usize,
    src_height: usize,
    dst_width: usize,
    dst_height: usize,
    channels: usize,
    element_type: ElementType,
    method: Method,
    align: usize,
    variant: Variant,
}

impl ResizeParams {
    pub fn new(
        src_width: usize,
        src_height: usize,
        dst_width: usize,
        dst_height: usize,
        channels: usize,
        element_type: ElementType,
        method: Method,
    ) -> Result<Self> {
        if src_width == 0 || src_height == 0 {
            return Err(Error::InvalidConfiguration("source dimensions must be positive"));
        }
        if dst_width == 0 || dst_height == 0 {
            return Err(Error::InvalidConfiguration(
                "destination dimensions must be positive",
            ));
        }
        if !(1..=4).contains(&channels) {
            return Err(Error::InvalidConfiguration("channel count must be in 1..=4"));
        }

        let variant = resolve_variant(
            src_width,
            src_height,
            dst_width,
            dst_height,
            element_type,
            method,
        )
        .ok_or(Error::InvalidConfiguration(
            "unsupported method and element type pairing",
        ))?;

        Ok(Self {
            src_width,
            src_height,
            dst_width,
            dst_height,
            channels,
            element_type,
            method,
            align: 1,
            variant,
        })
    }

    /// Returns a copy tagged with a tier's vector width in bytes.
    pub fn with_align(mut self, align: usize) -> Self {
        debug_assert!(align.is_power_of_two());
        self.align = align;
        self
    }

    pub fn src_width(&self) -> usize {
        self.src_width
    }

    pub fn src_height(&self) -> usize {
        self.src_height
    }

    pub fn dst_width(&self) -> usize {
        self.dst_width
    }

    pub fn dst_height(&self) -> usize {
        self.dst_height
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn element_type(&self) -> ElementType {
        self.element_type
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Vector width in bytes.
    pub fn a(&self) -> usize {
        self.align
    }

    /// Vector width in 32-bit lanes.
    pub fn f(&self) -> usize {
        (self.align / 4).max(1)
    }

    pub fn pixel_size(&self) -> usize {
        self.channels * self.element_type.size()
    }

    pub fn src_row_bytes(&self) -> usize {
        self.src_width * self.pixel_size()
    }

    pub fn dst_row_bytes(&self) -> usize {
        self.dst_width * self.pixel_size()
    }

    pub fn is_nearest(&self) -> bool {
        self.variant == Variant::Nearest
    }

    pub fn is_byte_bilinear(&self) -> bool {
        self.variant == Variant::ByteBilinear
    }

    pub fn is_byte_bilinear_compat(&self) -> bool {
        self.variant == Variant::ByteBilinearCompat
    }

    pub fn is_short_bilinear(&self) -> bool {
        self.variant == Variant::ShortBilinear
    }

    pub fn is_float_bilinear(&self) -> bool {
        self.variant == Variant::FloatBilinear
    }

    pub fn is_half_bilinear(&self) -> bool {
        self.variant == Variant::HalfBilinear
    }

    pub fn is_bf16_bilinear(&self) -> bool {
        self.variant == Variant::Bf16Bilinear
    }

    pub fn is_byte_bicubic(&self) -> bool {
        self.variant == Variant::ByteBicubic
    }

    pub fn is_area_2x(&self) -> bool {
        self.variant == Variant::Area2x
    }

    pub fn is_area_general(&self) -> bool {
        self.variant == Variant::AreaGeneral
    }
}

fn resolve_variant(
    src_width: usize,
    src_height: usize,
    dst_width: usize,
    dst_height: usize,
    element_type: ElementType,
    method: Method,
) -> Option<Variant> {
    use ElementType as E;

    let variant = match (method, element_type) {
        (Method::Nearest, _) => Variant::Nearest,
        (Method::Bilinear, E::U8) => Variant::ByteBilinear,
        (Method::Bilinear, E::U16) => Variant::ShortBilinear,
        (Method::Bilinear, E::F32) => Variant::FloatBilinear,
        (Method::Bilinear, E::F16) => Variant::HalfBilinear,
        (Method::Bilinear, E::Bf16) => Variant::Bf16Bilinear,
        (Method::BilinearCompat, E::U8) => Variant::ByteBilinearCompat,
        (Method::Bicubic, E::U8) => Variant::ByteBicubic,
        (Method::Area, E::U8 | E::U16 | E::F32) => {
            if src_width == 2 * dst_width && src_height == 2 * dst_height {
                Variant::Area2x
            } else {
                Variant::AreaGeneral
            }
        }
        _ => return None,
    };
    Some(variant)
}

#[cfg(test)]
mod tests {
    use vr_core::{ElementType, Error};

    use super::{Method, ResizeParams, Variant};

    fn flags(p: &ResizeParams) -> [bool; 10] {
        [
            p.is_nearest(),
            p.is_byte_bilinear(),
            p.is_byte_bilinear_compat(),
            p.is_short_bilinear(),
            p.is_float_bilinear(),
            p.is_half_bilinear(),
            p.is_bf16_bilinear(),
            p.is_byte_bicubic(),
            p.is_area_2x(),
            p.is_area_general(),
        ]
    }

    #[test]
    fn exactly_one_flag_for_every_valid_pairing() {
        for method in Method::ALL {
            for ty in ElementType::ALL {
                for (sw, sh) in [(8, 6), (9, 7)] {
                    let Ok(p) = ResizeParams::new(sw, sh, 4, 3, 3, ty, method) else {
                        continue;
                    };
                    let set = flags(&p).iter().filter(|&&f| f).count();
                    assert_eq!(set, 1, "{method:?}/{ty:?} -> {:?}", p.variant());
                }
            }
        }
    }

    #[test]
    fn area_resolves_2x_only_for_exact_halving() {
        let p = ResizeParams::new(8, 6, 4, 3, 1, ElementType::U8, Method::Area).unwrap();
        assert_eq!(p.variant(), Variant::Area2x);
        let p = ResizeParams::new(8, 6, 4, 2, 1, ElementType::F32, Method::Area).unwrap();
        assert_eq!(p.variant(), Variant::AreaGeneral);
        let p = ResizeParams::new(9, 6, 4, 3, 1, ElementType::U16, Method::Area).unwrap();
        assert_eq!(p.variant(), Variant::AreaGeneral);
    }

    #[test]
    fn rejects_bad_geometry_and_pairings() {
        let bad = [
            ResizeParams::new(0, 4, 2, 2, 1, ElementType::U8, Method::Nearest),
            ResizeParams::new(4, 4, 2, 0, 1, ElementType::U8, Method::Nearest),
            ResizeParams::new(4, 4, 2, 2, 0, ElementType::U8, Method::Nearest),
            ResizeParams::new(4, 4, 2, 2, 5, ElementType::U8, Method::Nearest),
            ResizeParams::new(4, 4, 2, 2, 1, ElementType::F32, Method::Bicubic),
            ResizeParams::new(4, 4, 2, 2, 1, ElementType::U16, Method::BilinearCompat),
            ResizeParams::new(4, 4, 2, 2, 1, ElementType::F16, Method::Area),
        ];
        for res in bad {
            assert!(matches!(res, Err(Error::InvalidConfiguration(_))), "{res:?}");
        }
    }

    #[test]
    fn derived_constants() {
        let p = ResizeParams::new(10, 4, 6, 2, 3, ElementType::U16, Method::Bilinear)
            .unwrap()
            .with_align(32);
        assert_eq!(p.pixel_size(), 6);
        assert_eq!(p.src_row_bytes(), 60);
        assert_eq!(p.dst_row_bytes(), 36);
        assert_eq!(p.a(), 32);
        assert_eq!(p.f(), 8);
        assert_eq!(p.with_align(1).f(), 1);
    }

    #[test]
    fn method_codes_round_trip() {
        for m in Method::ALL {
            assert_eq!(Method::from_code(m as u32), Some(m));
        }
        assert_eq!(Method::from_code(99), None);
    }
}
