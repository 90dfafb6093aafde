use std::fmt::Debug;
use std::io::{Cursor, ErrorKind};

use nfs_mamont_client::xdr::mount::{mountres3, mountstat3};
use nfs_mamont_client::xdr::nfs3::dir::{createhow3, dirlistplus3, LOOKUP3res, READDIRPLUS3res};
use nfs_mamont_client::xdr::nfs3::file::{READ3res, WRITE3res};
use nfs_mamont_client::xdr::nfs3::{
    fattr3, ftype3, nfs_fh3, nfsres3, nfsstat3, nfstime3, sattr3, set_time, wcc_attr, wcc_data,
    GETATTR3res, NFS3_FHSIZE,
};
use nfs_mamont_client::xdr::{
    deserialize, deserialize_opaque_bounded, deserialize_string_bounded, Deserialize, Serialize,
};

#[derive(Default)]
struct Context {
    buf: Vec<u8>,
}

trait TestValue: Deserialize + Serialize + Eq + Default + Debug + Clone {}
impl<T: Deserialize + Serialize + Eq + Default + Debug + Clone> TestValue for T {}

impl Context {
    fn check<T: TestValue>(&mut self, src_value: &T) {
        for capacity in 0..32 {
            for exsist in 0..capacity {
                self.buf = Vec::with_capacity(capacity);
                self.buf.resize(exsist, Default::default());

                src_value.serialize(&mut self.buf).expect("cannot serialize");
                assert_eq!((self.buf.len() - exsist) % 4, 0);

                let result_value =
                    deserialize::<T>(&mut &self.buf[exsist..]).expect("cannot deserialize");

                assert_eq!(src_value, &result_value);
            }
        }
    }

    fn check_multi<T: TestValue>(&mut self, src_values: &[T]) {
        src_values.iter().for_each(|i| self.check(i));
    }
}

#[derive(Default, PartialEq, Eq, Debug, Clone)]
struct TestForVecU8(Vec<u8>);

impl Serialize for TestForVecU8 {
    fn serialize<W: std::io::Write>(&self, dest: &mut W) -> std::io::Result<()> {
        self.0.serialize(dest)
    }
}

impl Deserialize for TestForVecU8 {
    fn deserialize<R: std::io::Read>(&mut self, src: &mut R) -> std::io::Result<()> {
        self.0.deserialize(src)
    }
}

#[derive(Default, PartialEq, Eq, Debug, Clone)]
struct TestForVecU32(Vec<u32>);

impl Serialize for TestForVecU32 {
    fn serialize<W: std::io::Write>(&self, dest: &mut W) -> std::io::Result<()> {
        self.0.serialize(dest)
    }
}

impl Deserialize for TestForVecU32 {
    fn deserialize<R: std::io::Read>(&mut self, src: &mut R) -> std::io::Result<()> {
        self.0.deserialize(src)
    }
}

#[derive(Default, PartialEq, Eq, Debug, Clone)]
struct TestForString(String);

impl Serialize for TestForString {
    fn serialize<W: std::io::Write>(&self, dest: &mut W) -> std::io::Result<()> {
        self.0.serialize(dest)
    }
}

impl Deserialize for TestForString {
    fn deserialize<R: std::io::Read>(&mut self, src: &mut R) -> std::io::Result<()> {
        self.0.deserialize(src)
    }
}

#[test]
fn test_scalar_bijection() {
    let mut ctx = Context::default();

    ctx.check_multi(&[true, false]);

    ctx.check_multi(&[i32::MIN, -1i32, 0i32, 1i32, i32::MAX]);
    ctx.check_multi(&[i64::MIN, -1i64, 0i64, 1i64, i64::MAX]);

    ctx.check_multi(&[u32::MIN, 0u32, 1u32, 2u32, u32::MAX]);
    ctx.check_multi(&[u64::MIN, 0u64, 1u64, 2u64, u64::MAX]);
}

#[test]
fn test_array_bijection() {
    let mut ctx = Context::default();

    ctx.check(&[1u8]);
    ctx.check(&[1u8, 2u8, 3u8]);
    ctx.check(&[1u8, 2u8, 3u8, 4u8]);
    ctx.check(&[1u8, 2u8, 3u8, 4u8, 5u8, 6u8]);
    ctx.check(&[0xffu8; 8]);
}

#[test]
fn test_fixed_opaque_is_padded() {
    let mut buf = Vec::new();
    [1u8, 2u8, 3u8, 4u8, 5u8].serialize(&mut buf).expect("cannot serialize");
    assert_eq!(buf, [1, 2, 3, 4, 5, 0, 0, 0]);
}

#[test]
fn test_option_bijection() {
    let mut ctx = Context::default();

    ctx.check_multi(&[None, Some(0u32), Some(u32::MAX)]);
    ctx.check_multi(&[None, Some(-1i64)]);
    ctx.check_multi(&[None, Some(vec![]), Some(vec![1u8, 2u8, 3u8])]);
    ctx.check_multi(&[None, Some(TestForString(String::from("abc")))]);
}

#[test]
fn test_str_bijection() {
    let mut ctx = Context::default();

    ctx.check_multi(&[
        TestForString(String::from("")),
        TestForString(String::from("abc1234+-")),
        TestForString(String::from("abc")),
    ]);
}

#[test]
fn test_vec_bijection() {
    let mut ctx = Context::default();

    ctx.check_multi(&[
        TestForVecU8(vec![]),
        TestForVecU8(vec![1u8]),
        TestForVecU8(vec![1u8, 2u8, 3u8]),
        TestForVecU8(vec![1u8, 2u8, 3u8, 4u8]),
    ]);
    ctx.check_multi(&[
        TestForVecU32(vec![]),
        TestForVecU32(vec![1u32]),
        TestForVecU32(vec![1u32, 2u32, 3u32]),
        TestForVecU32(vec![1u32, 2u32, 3u32, 4u32]),
    ]);
}

fn encode<T: Serialize>(value: &T) -> Vec<u8> {
    let mut buf = Vec::new();
    value.serialize(&mut buf).expect("cannot serialize");
    buf
}

fn words(values: &[u32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_be_bytes()).collect()
}

/// Decodes `T` from exactly `buf` and checks every byte was consumed.
fn decode_exact<T: Deserialize + Default>(buf: &[u8]) -> T {
    let mut cursor = Cursor::new(buf);
    let value = deserialize::<T>(&mut cursor).expect("cannot deserialize");
    assert_eq!(cursor.position() as usize, buf.len(), "trailing bytes left");
    value
}

fn sample_attr() -> fattr3 {
    fattr3 {
        ftype: ftype3::NF3REG,
        mode: 0o644,
        nlink: 1,
        uid: 1000,
        gid: 1000,
        size: 12345,
        used: 16384,
        fsid: 7,
        fileid: 99,
        mtime: nfstime3 { seconds: 1_700_000_000, nseconds: 500 },
        ..Default::default()
    }
}

#[test]
fn test_opaque_padding() {
    for len in 0..9_usize {
        let data = vec![0xaa_u8; len];
        let buf = encode(&data);
        let padding = (4 - len % 4) % 4;
        assert_eq!(buf.len(), 4 + len + padding);
        assert_eq!(&buf[..4], &(len as u32).to_be_bytes());
        assert!(buf[4 + len..].iter().all(|b| *b == 0));
        assert_eq!(decode_exact::<Vec<u8>>(&buf), data);
    }
}

#[test]
fn test_integers_are_big_endian() {
    assert_eq!(encode(&0x0102_0304_u32), [1, 2, 3, 4]);
    assert_eq!(encode(&-2_i32), [0xff, 0xff, 0xff, 0xfe]);
    assert_eq!(encode(&0x0102_0304_0506_0708_u64), [1, 2, 3, 4, 5, 6, 7, 8]);
    assert_eq!(encode(&true), [0, 0, 0, 1]);
}

#[test]
fn test_nonzero_bool_is_true() {
    assert!(decode_exact::<bool>(&words(&[2])));
    assert!(!decode_exact::<bool>(&words(&[0])));
}

#[test]
fn test_strings_are_single_byte() {
    let latin = String::from("caf\u{e9}");
    let buf = encode(&latin);
    assert_eq!(buf, [0, 0, 0, 4, b'c', b'a', b'f', 0xe9]);
    assert_eq!(decode_exact::<String>(&buf), latin);

    let mut sink = Vec::new();
    let err = String::from("\u{20ac}").serialize(&mut sink).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidData);
}

#[test]
fn test_bounded_reads() {
    let buf = encode(&vec![1_u8; 10]);
    assert_eq!(deserialize_opaque_bounded(&mut &buf[..], 10).unwrap().len(), 10);
    let err = deserialize_opaque_bounded(&mut &buf[..], 9).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidData);

    let buf = encode(&String::from("export"));
    assert_eq!(deserialize_string_bounded(&mut &buf[..], 6).unwrap(), "export");
    assert!(deserialize_string_bounded(&mut &buf[..], 5).is_err());

    // a huge declared length fails before any data is read
    let err = deserialize_opaque_bounded(&mut &words(&[u32::MAX])[..], 64).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidData);
}

#[test]
fn test_file_handle_size_limit() {
    let fh = nfs_fh3::from(vec![3; NFS3_FHSIZE as usize]);
    assert_eq!(decode_exact::<nfs_fh3>(&encode(&fh)), fh);

    let oversized = encode(&vec![3_u8; NFS3_FHSIZE as usize + 1]);
    let err = deserialize::<nfs_fh3>(&mut &oversized[..]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidData);
}

#[test]
fn test_nfs_structs_bijection() {
    let mut ctx = Context::default();

    ctx.check(&sample_attr());
    ctx.check(&wcc_data { before: Some(wcc_attr::from(&sample_attr())), after: None });
    ctx.check(&wcc_data { before: None, after: Some(sample_attr()) });
    ctx.check(&sattr3 {
        mode: Some(0o700),
        size: Some(0),
        mtime: set_time::SET_TO_CLIENT_TIME(nfstime3 { seconds: 5, nseconds: 6 }),
        atime: set_time::SET_TO_SERVER_TIME,
        ..Default::default()
    });
    ctx.check(&createhow3::EXCLUSIVE([9; 8]));
    ctx.check_multi(&[
        GETATTR3res::Ok(sample_attr()),
        GETATTR3res::Fail(nfsstat3::NFS3ERR_STALE, ()),
    ]);
}

#[test]
fn test_failed_results_stop_after_their_body() {
    // GETATTR: nothing follows a failure status
    let res: GETATTR3res = decode_exact(&words(&[nfsstat3::NFS3ERR_NOENT as u32]));
    assert_eq!(res, nfsres3::Fail(nfsstat3::NFS3ERR_NOENT, ()));

    // LOOKUP: only the directory attributes follow
    let res: LOOKUP3res = decode_exact(&words(&[nfsstat3::NFS3ERR_NOENT as u32, 0]));
    assert_eq!(res.status(), nfsstat3::NFS3ERR_NOENT);

    // READ: only the file attributes follow
    let mut buf = words(&[nfsstat3::NFS3ERR_ACCES as u32, 1]);
    buf.extend(encode(&sample_attr()));
    let res: READ3res = decode_exact(&buf);
    assert_eq!(res, nfsres3::Fail(nfsstat3::NFS3ERR_ACCES, Some(sample_attr())));

    // WRITE: only the wcc data follows
    let res: WRITE3res = decode_exact(&words(&[nfsstat3::NFS3ERR_NOSPC as u32, 0, 0]));
    assert_eq!(res, nfsres3::Fail(nfsstat3::NFS3ERR_NOSPC, wcc_data::default()));

    // READDIRPLUS: only the directory attributes follow
    let res: READDIRPLUS3res = decode_exact(&words(&[nfsstat3::NFS3ERR_ACCES as u32, 0]));
    assert_eq!(res.status(), nfsstat3::NFS3ERR_ACCES);

    // MNT: nothing follows a failure status
    let res: mountres3 = decode_exact(&words(&[mountstat3::MNT3ERR_NOENT as u32]));
    assert!(matches!(res, mountres3::Err(mountstat3::MNT3ERR_NOENT)));
}

#[test]
fn test_truncated_success_is_an_error() {
    let err = deserialize::<GETATTR3res>(&mut &words(&[0, 1])[..]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnexpectedEof);

    let err = deserialize::<READ3res>(&mut &words(&[0, 0, 5])[..]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnexpectedEof);
}

#[test]
fn test_oversized_read_data_is_rejected() {
    // status OK, no attributes, count, eof, then a 4 GiB data length
    let buf = words(&[0, 0, 5, 1, 0xffff_fff0]);
    let err = deserialize::<READ3res>(&mut &buf[..]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidData);
}

#[test]
fn test_unknown_status_is_rejected() {
    let err = deserialize::<GETATTR3res>(&mut &words(&[12345])[..]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidData);
}

#[test]
fn test_empty_directory_list() {
    let list = dirlistplus3 { entries: Vec::new(), eof: true };
    assert_eq!(encode(&list), words(&[0, 1]));
    assert_eq!(decode_exact::<dirlistplus3>(&words(&[0, 1])), list);
}
