pub use sha3::{Digest, Keccak256, Keccak512};

pub fn keccak_256<T: AsRef<[u8]>>(s: T) -> [u8; 32] {
    Keccak256::digest(s.as_ref()).into()
}

pub fn keccak_512<T: AsRef<[u8]>>(s: T) -> [u8; 64] {
    Keccak512::digest(s.as_ref()).into()
}

#[test]
fn empty_keccak_256() {
    let actual = keccak_256([]);
    let expected = "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470";
    assert_eq!(&faster_hex::hex_string(&actual).unwrap(), expected);
}

#[test]
fn zero_keccak_256() {
    let actual = keccak_256([0u8; 32]);
    let expected = "290decd9548b62a8d60345a988386fc84ba6bc95484008f6362f93160ef3e563";
    assert_eq!(&faster_hex::hex_string(&actual).unwrap(), expected);
}

#[test]
fn empty_keccak_512() {
    let actual = keccak_512([]);
    let expected = "0eab42de4c3ceb9235fc91acffe746b29c29a8c366b7c60e4e67c466f36a4304\
                    c00fa9caf9d87976ba469bcbe06713b435f091ef2769fb160cdab33d3670680e";
    assert_eq!(&faster_hex::hex_string(&actual).unwrap(), expected);
}
