//! Geohash encoding for complaint locations.
//!
//! Bits alternate between longitude and latitude (longitude first), each bit
//! halving the remaining interval; every 5 bits become one base-32 character.

const BASE32: &[u8; 32] = b"0123456789bcdefghjkmnpqrstuvwxyz";

/// Encode a coordinate pair into a geohash of `precision` characters
pub fn encode(latitude: f64, longitude: f64, precision: usize) -> String {
    let mut lat_range = (-90.0_f64, 90.0_f64);
    let mut lon_range = (-180.0_f64, 180.0_f64);

    let mut hash = String::with_capacity(precision);
    let mut even_bit = true;
    let mut bits = 0;
    let mut index = 0usize;

    while hash.len() < precision {
        let (range, value) = if even_bit {
            (&mut lon_range, longitude)
        } else {
            (&mut lat_range, latitude)
        };

        let mid = (range.0 + range.1) / 2.0;
        if value >= mid {
            index = (index << 1) | 1;
            range.0 = mid;
        } else {
            index <<= 1;
            range.1 = mid;
        }

        even_bit = !even_bit;
        bits += 1;

        if bits == 5 {
            hash.push(BASE32[index] as char);
            bits = 0;
            index = 0;
        }
    }

    hash
}
