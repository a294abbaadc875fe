//! Known-answer tests against the published NIST and RFC vectors.

use hex_literal::hex;
use quill_digest::{hmac, md5, sha1, sha32, sha64, SHA1, SHA256, SHA512};

#[test]
fn md5_vectors() {
    assert_eq!(md5::md5(b""), hex!("d41d8cd98f00b204e9800998ecf8427e"));
    assert_eq!(md5::md5(b"a"), hex!("0cc175b9c0f1b6a831c399e269772661"));
    assert_eq!(md5::md5(b"abc"), hex!("900150983cd24fb0d6963f7d28e17f72"));
    assert_eq!(
        md5::md5(b"message digest"),
        hex!("f96b697d7cb7938d525a2f31aaf161d0")
    );
    assert_eq!(
        md5::md5(b"The quick brown fox jumps over the lazy dog"),
        hex!("9e107d9d372bb6826bd81d3542a419d6")
    );
}

#[test]
fn sha1_vectors() {
    assert_eq!(
        sha1::sha1(b""),
        hex!("da39a3ee5e6b4b0d3255bfef95601890afd80709")
    );
    assert_eq!(
        sha1::sha1(b"abc"),
        hex!("a9993e364706816aba3e25717850c26c9cd0d89d")
    );
    assert_eq!(
        sha1::sha1(b"The quick brown fox jumps over the lazy dog"),
        hex!("2fd4e1c67a2d28fced849ee1bb76e7391b93eb12")
    );
}

#[test]
fn sha224_vectors() {
    assert_eq!(
        sha32::sha224(b""),
        hex!("d14a028c2a3a2bc9476102bb288234c415a2b01f828ea62ac5b3e42f")
    );
    assert_eq!(
        sha32::sha224(b"abc"),
        hex!("23097d223405d8228642a477bda255b32aadbce4bda0b3f7e36c9da7")
    );
}

#[test]
fn sha256_vectors() {
    assert_eq!(
        sha32::sha256(b""),
        hex!("e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855")
    );
    assert_eq!(
        sha32::sha256(b"abc"),
        hex!("ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad")
    );
}

#[test]
fn sha384_vectors() {
    assert_eq!(
        sha64::sha384(b""),
        hex!(
            "38b060a751ac96384cd9327eb1b1e36a21fdb71114be07434c0cc7bf63f6e1da"
            "274edebfe76f65fbd51ad2f14898b95b"
        )
    );
    assert_eq!(
        sha64::sha384(b"abc"),
        hex!(
            "cb00753f45a35e8bb5a03d699ac65007272c32ab0eded1631a8b605a43ff5bed"
            "8086072ba1e7cc2358baeca134c825a7"
        )
    );
}

#[test]
fn sha512_vectors() {
    assert_eq!(
        sha64::sha512(b""),
        hex!(
            "cf83e1357eefb8bdf1542850d66d8007d620e4050b5715dc83f4a921d36ce9ce"
            "47d0d13c5d85f2b0ff8318d2877eec2f63b931bd47417a81a538327af927da3e"
        )
    );
    assert_eq!(
        sha64::sha512(b"abc"),
        hex!(
            "ddaf35a193617abacc417349ae20413112e6fa4e89a97ea20a9eeee64b55d39a"
            "2192992a274fc1a836ba3c23a3feebbd454d4423643ce80e2a9ac94fa54ca49f"
        )
    );
    // Two-block FIPS example.
    assert_eq!(
        sha64::sha512(
            b"abcdefghbcdefghicdefghijdefghijkefghijklfghijklmghijklmn\
              hijklmnoijklmnopjklmnopqklmnopqrlmnopqrsmnopqrstnopqrstu"
        ),
        hex!(
            "8e959b75dae313da8cf4f72814fc143f8f7779c6eb9f7fa17299aeadb6889018"
            "501d289e4900f7e4331b99dec4b5433ac7d329eeb6dd26545e96e55b874be909"
        )
    );
}

#[test]
fn hmac_vectors() {
    // RFC 2202 / common published vectors.
    assert_eq!(
        hmac(&SHA1, b"The quick brown fox jumps over the lazy dog", b"key"),
        hex!("de7c9b85b8b78aa6bc8a7a36f70a90701c9db4d9")
    );
    assert_eq!(
        hmac(&SHA256, b"The quick brown fox jumps over the lazy dog", b"key"),
        hex!("f7bc83f430538424b13298e6aa6fb143ef4d59a14946175997479dbc2d1a3cda")
    );
    assert_eq!(
        hmac(&SHA512, b"The quick brown fox jumps over the lazy dog", b"key"),
        hex!(
            "b42af09057bac1e2d41708e48a902e09b5ff7f12ab428a4fe86653c73dd248fb"
            "82f948a549f7b791a5b41915ee4d1ec3935357e4e2317250d0372afa2ebeeb3a"
        )
    );
}

#[test]
fn hmac_larger_than_block_size_key() {
    // RFC 4231 test case 6: 131-byte key forces the hash-key-first branch.
    let key = vec![0xaau8; 131];
    assert_eq!(
        hmac(
            &SHA256,
            b"Test Using Larger Than Block-Size Key - Hash Key First",
            &key
        ),
        hex!("60e431591ee0b67f0d8a26aacbf5b77f8e0bc6213728c5140546040f0ee37f54")
    );
}

#[test]
fn long_input_exercises_wide_length_field() {
    // One million 'a' bytes, the classic length-extension smoke test.
    let data = vec![b'a'; 1_000_000];
    assert_eq!(
        sha32::sha256(&data),
        hex!("cdc76e5c9914fb9281a1c7e284d73e67f1809a48a497200e046d39ccc7112cd0")
    );
    assert_eq!(
        sha1::sha1(&data),
        hex!("34aa973cd4c4daa4f61eeb2bdbad27316534016f")
    );
    assert_eq!(md5::md5(&data), hex!("7707d6ae4e027c70eea2a935c2296f21"));
}
