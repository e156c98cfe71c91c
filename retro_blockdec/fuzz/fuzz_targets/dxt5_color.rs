#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: [u8; 16]| {
    let mut decompressed = [0u8; 16 * 4];
    retro_blockdec::dxt5(&data, &mut decompressed, 16);

    // Opaque DXT1 blocks share the same color palette as DXT5.
    let c0 = u16::from_le_bytes([data[8], data[9]]);
    let c1 = u16::from_le_bytes([data[10], data[11]]);
    if c0 > c1 {
        let mut color = [0u8; 16 * 4];
        retro_blockdec::dxt1(data[8..].try_into().unwrap(), &mut color, 16);
        for (expected, actual) in color.chunks_exact(4).zip(decompressed.chunks_exact(4)) {
            assert_eq!(expected[..3], actual[..3]);
        }
    }
});
