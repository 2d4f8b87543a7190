use half::{bf16, f16};

/// Pixel sample representation.
///
/// The discriminants are stable and double as the integer codes used by the
/// C handle API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum ElementType {
    U8 = 0,
    U16 = 1,
    F32 = 2,
    F16 = 3,
    Bf16 = 4,
}

impl ElementType {
    pub const ALL: [ElementType; 5] = [Self::U8, Self::U16, Self::F32, Self::F16, Self::Bf16];

    /// Size of one sample in bytes.
    pub const fn size(self) -> usize {
        match self {
            Self::U8 => 1,
            Self::U16 | Self::F16 | Self::Bf16 => 2,
            Self::F32 => 4,
        }
    }

    pub const fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(Self::U8),
            1 => Some(Self::U16),
            2 => Some(Self::F32),
            3 => Some(Self::F16),
            4 => Some(Self::Bf16),
            _ => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::F32 => "f32",
            Self::F16 => "f16",
            Self::Bf16 => "bf16",
        }
    }
}

mod sealed {
    pub trait Sealed {}

    impl Sealed for u8 {}
    impl Sealed for u16 {}
    impl Sealed for f32 {}
    impl Sealed for half::f16 {}
    impl Sealed for half::bf16 {}
}

/// A Rust type that can back an image sample.
///
/// Sealed: the set of implementors is exactly the set of [`ElementType`]
/// tags, which lets views be reinterpreted between a generic `T` and its
/// concrete type once the tag has been checked.
pub trait Element: sealed::Sealed + bytemuck::Pod + Default + Send + Sync + 'static {
    const TYPE: ElementType;

    fn to_f32(self) -> f32;

    /// Narrows a blended value. Integer types round half up and saturate.
    fn from_f32(v: f32) -> Self;
}

impl Element for u8 {
    const TYPE: ElementType = ElementType::U8;

    #[inline]
    fn to_f32(self) -> f32 {
        self as f32
    }

    #[inline]
    fn from_f32(v: f32) -> Self {
        (v + 0.5).floor().clamp(0.0, 255.0) as u8
    }
}

impl Element for u16 {
    const TYPE: ElementType = ElementType::U16;

    #[inline]
    fn to_f32(self) -> f32 {
        self as f32
    }

    #[inline]
    fn from_f32(v: f32) -> Self {
        (v + 0.5).floor().clamp(0.0, 65535.0) as u16
    }
}

impl Element for f32 {
    const TYPE: ElementType = ElementType::F32;

    #[inline]
    fn to_f32(self) -> f32 {
        self
    }

    #[inline]
    fn from_f32(v: f32) -> Self {
        v
    }
}

impl Element for f16 {
    const TYPE: ElementType = ElementType::F16;

    #[inline]
    fn to_f32(self) -> f32 {
        f16::to_f32(self)
    }

    #[inline]
    fn from_f32(v: f32) -> Self {
        f16::from_f32(v)
    }
}

impl Element for bf16 {
    const TYPE: ElementType = ElementType::Bf16;

    #[inline]
    fn to_f32(self) -> f32 {
        bf16::to_f32(self)
    }

    #[inline]
    fn from_f32(v: f32) -> Self {
        bf16::from_f32(v)
    }
}

#[cfg(test)]
mod tests {
    use half::{bf16, f16};

    use super::{Element, ElementType};

    #[test]
    fn codes_round_trip_and_sizes() {
        for ty in ElementType::ALL {
            assert_eq!(ElementType::from_code(ty as u32), Some(ty));
        }
        assert_eq!(ElementType::from_code(5), None);
        assert_eq!(ElementType::U8.size(), 1);
        assert_eq!(ElementType::Bf16.size(), 2);
        assert_eq!(ElementType::F32.size(), 4);
    }

    #[test]
    fn integer_narrowing_rounds_half_up_and_saturates() {
        assert_eq!(u8::from_f32(1.49), 1);
        assert_eq!(u8::from_f32(1.5), 2);
        assert_eq!(u8::from_f32(-3.0), 0);
        assert_eq!(u8::from_f32(300.0), 255);
        assert_eq!(u16::from_f32(65535.7), 65535);
        assert_eq!(u16::from_f32(0.5), 1);
    }

    #[test]
    fn half_types_round_trip_exact_values() {
        assert_eq!(<f16 as Element>::from_f32(0.25).to_f32(), 0.25);
        assert_eq!(<bf16 as Element>::from_f32(-2.0).to_f32(), -2.0);
        assert_eq!(<f16 as Element>::TYPE, ElementType::F16);
    }
}
