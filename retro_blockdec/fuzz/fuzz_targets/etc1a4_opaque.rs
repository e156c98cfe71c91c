#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|color: [u8; 8]| {
    // ETC1A4 with every alpha nibble set should match plain ETC1.
    let mut expected = [0u8; 16 * 4];
    retro_blockdec::etc1(&color, &mut expected, 16);

    let mut block = [0xFFu8; 16];
    block[8..].copy_from_slice(&color);
    let mut actual = [0u8; 16 * 4];
    retro_blockdec::etc1a4(&block, &mut actual, 16);

    assert_eq!(expected, actual);
});
