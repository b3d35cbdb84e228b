use num_traits::AsPrimitive;

/// Fixed width primitives that can be read straight out of a binary payload.
///
/// OpenFOAM writes binary lists in the byte order of the machine that produced
/// them, so values are always read native-endian.
pub(crate) trait NativeBytes: Copy {
    const SIZE: usize;

    fn from_ne_slice(bytes: &[u8]) -> Self;
}

macro_rules! native_bytes {
    ($($ty:ty),*) => {
        $(
            impl NativeBytes for $ty {
                const SIZE: usize = std::mem::size_of::<$ty>();

                fn from_ne_slice(bytes: &[u8]) -> Self {
                    let mut arr = [0; std::mem::size_of::<$ty>()];
                    arr.copy_from_slice(bytes);
                    <$ty>::from_ne_bytes(arr)
                }
            }
        )*
    };
}

native_bytes!(f32, f64, i32, i64);

/// decode a packed buffer of `T` into a vector of `OUT`
///
/// `bytes.len()` must be a multiple of `T::SIZE`, trailing bytes are ignored
pub(crate) fn decode_native<T, OUT>(bytes: &[u8]) -> Vec<OUT>
where
    T: NativeBytes + AsPrimitive<OUT>,
    OUT: Copy + 'static,
{
    bytes
        .chunks_exact(T::SIZE)
        .map(|chunk| T::from_ne_slice(chunk).as_())
        .collect()
}

/// Round to a number of decimal places, ties to even.
///
/// Values whose scaled magnitude no longer fits in the mantissa are already
/// exact at that precision and are returned untouched.
pub fn round_to(value: f64, precision: i32) -> f64 {
    if !value.is_finite() {
        return value;
    }

    let scale = 10f64.powi(precision);
    let scaled = value * scale;

    if !scaled.is_finite() || scaled.abs() >= 2f64.powi(52) {
        return value;
    }

    scaled.round_ties_even() / scale
}
