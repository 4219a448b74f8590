//! Two authorities, one user, every outcome the server can report.

use mpin_engine::{
    client, client_1, client_2, client_permit_share, client_secret_share, decode_auth_message,
    encode_auth_message, extract_pin, hash_id, pin_error, random_generate, recombine_g1,
    recombine_g2, rng::test_seed, ser::MAX_AUTH_MESSAGE_LEN, server, server_2, server_challenge,
    server_secret_share, ClientConfig, ClientRequest, Csprng, ErrorCode, HashType, IdentityClaim,
    MasterSecretShare, Octet, PermitUse, ServerClock, ServerConfig, ServerSecret, TimePermit, Token,
    VerifyErr, FS,
};
use mpin_primitives::fit;

const ID: &[u8] = b"testuser@miracl.com";
const DATE: u32 = 20_123;
const TIME: u32 = DATE * 86_400 + 45_000;
const NOW: ServerClock = ServerClock { today: DATE, time: TIME };

struct World {
    rng: Csprng,
    masters: [MasterSecretShare; 2],
    server_secret: ServerSecret,
    token: Token,
}

impl World {
    fn new(hash_type: HashType) -> Self {
        let mut rng = Csprng::from_seed(&test_seed()).expect("seed");
        let masters = [random_generate(&mut rng).expect("ms1"), random_generate(&mut rng).expect("ms2")];
        let hid = hash_id(hash_type, ID).expect("hid");
        let server_secret = recombine_g2(
            &server_secret_share(&masters[0]).expect("ss1"),
            &server_secret_share(&masters[1]).expect("ss2"),
        )
        .expect("ss");
        let client_secret = recombine_g1(
            &client_secret_share(&masters[0], &hid).expect("cs1"),
            &client_secret_share(&masters[1], &hid).expect("cs2"),
        )
        .expect("cs");
        let token = extract_pin(hash_type, ID, 1234, &client_secret).expect("token");
        Self { rng, masters, server_secret, token }
    }

    fn permit(&self, hash_type: HashType, date: u32) -> TimePermit {
        let hid = hash_id(hash_type, ID).expect("hid");
        recombine_g1(
            &client_permit_share(hash_type, date, &self.masters[0], &hid).expect("tp1"),
            &client_permit_share(hash_type, date, &self.masters[1], &hid).expect("tp2"),
        )
        .expect("tp")
    }

    /// One single-pass attempt, sent through the wire encoding.
    fn login(&mut self, cfg: &ClientConfig, pin: u32, permit_date: Option<u32>, message: Option<&[u8]>) -> Vec<u8> {
        let token = self.token.clone();
        let tp = permit_date.map(|d| self.permit(cfg.hash_type, d));
        let req = ClientRequest {
            identity: ID,
            pin,
            token: &token,
            permit: permit_date.zip(tp.as_ref()).map(|(date, permit)| PermitUse { date, permit }),
            message,
            time: TIME,
        };
        let out = client(cfg, &req, &mut self.rng).expect("client");
        encode_auth_message(&out.message).expect("encode")
    }

    fn verify(&self, cfg: &ServerConfig, wire: &[u8], clock: ServerClock) -> Result<(), VerifyErr> {
        let msg = decode_auth_message(wire).expect("decode");
        server(cfg, &self.server_secret, &msg, clock).map(|_| ())
    }
}

#[test]
fn hashed_identity_is_front_padded_digest() {
    let hid = hash_id(HashType::Sha256, ID).unwrap();
    let expected: [u8; FS] = fit(&HashType::Sha256.digest(&[ID]));
    assert_eq!(hex::encode(hid.as_bytes()), hex::encode(expected));
    assert!(hex::encode(hid.as_bytes()).starts_with(&"0".repeat(32)));
}

#[test]
fn registered_pin_succeeds_other_pin_fails() {
    let mut w = World::new(HashType::Sha256);
    let cfg = ClientConfig::default();
    let scfg = ServerConfig::for_client(cfg);

    let ok = w.login(&cfg, 1234, None, None);
    assert_eq!(w.verify(&scfg, &ok, NOW), Ok(()));

    let bad = w.login(&cfg, 4321, None, None);
    let err = w.verify(&scfg, &bad, NOW).unwrap_err();
    assert_eq!(err, VerifyErr::InvalidToken);
    assert_eq!(err.code(), ErrorCode::CryptoError);
}

#[test]
fn time_permit_lifecycle() {
    let mut w = World::new(HashType::Sha256);
    let cfg = ClientConfig::default();
    let scfg = ServerConfig { require_time_permit: true, ..ServerConfig::for_client(cfg) };

    let today = w.login(&cfg, 1234, Some(DATE), None);
    assert_eq!(w.verify(&scfg, &today, NOW), Ok(()));

    let wrong_pin = w.login(&cfg, 4321, Some(DATE), None);
    assert_eq!(w.verify(&scfg, &wrong_pin, NOW), Err(VerifyErr::InvalidToken));

    let tomorrow = ServerClock { today: DATE + 1, ..NOW };
    let err = w.verify(&scfg, &today, tomorrow).unwrap_err();
    assert_eq!(err, VerifyErr::PermitExpired);
    assert_eq!(err.code(), ErrorCode::PermitExpired);

    let no_permit = w.login(&cfg, 1234, None, None);
    assert_eq!(w.verify(&scfg, &no_permit, NOW), Err(VerifyErr::PermitExpired));
}

#[test]
fn anonymous_mode_end_to_end() {
    let mut w = World::new(HashType::Sha256);
    let cfg = ClientConfig { anonymous: true, ..ClientConfig::default() };
    let scfg = ServerConfig::for_client(cfg);
    let wire = w.login(&cfg, 1234, Some(DATE), None);

    let msg = decode_auth_message(&wire).unwrap();
    assert!(matches!(msg.claim, IdentityClaim::Hashed(_)));
    assert!(!wire.windows(ID.len()).any(|win| win == ID));
    assert_eq!(w.verify(&scfg, &wire, NOW), Ok(()));
}

#[test]
fn every_hash_selector_works() {
    for hash_type in [HashType::Sha256, HashType::Sha384, HashType::Sha512, HashType::Sha3_256] {
        let mut w = World::new(hash_type);
        let cfg = ClientConfig { hash_type, anonymous: false };
        let wire = w.login(&cfg, 1234, Some(DATE), Some(b"hello"));
        assert_eq!(w.verify(&ServerConfig::for_client(cfg), &wire, NOW), Ok(()));
        // A server on another selector recomputes different points.
        let other = ServerConfig {
            hash_type: if hash_type == HashType::Sha256 { HashType::Sha512 } else { HashType::Sha256 },
            ..ServerConfig::default()
        };
        assert_eq!(w.verify(&other, &wire, NOW), Err(VerifyErr::InvalidToken));
    }
}

#[test]
fn clock_skew_is_a_time_window_error() {
    let mut w = World::new(HashType::Sha256);
    let cfg = ClientConfig::default();
    let wire = w.login(&cfg, 1234, None, None);
    let err = w
        .verify(&ServerConfig::default(), &wire, ServerClock { time: TIME - 3_600, ..NOW })
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::TimeWindowError);
}

#[test]
fn wire_bytes_fit_declared_capacity() {
    let mut w = World::new(HashType::Sha256);
    let wire = w.login(&ClientConfig::default(), 1234, Some(DATE), Some(&[0xAB; 64]));
    let mut octet = Octet::new(MAX_AUTH_MESSAGE_LEN);
    octet.write(&wire).unwrap();
    assert_eq!(octet.as_bytes(), &wire[..]);
    let mut tiny = Octet::new(wire.len() - 1);
    assert!(tiny.write(&wire).is_err());
    assert!(tiny.is_empty());
}

#[test]
fn server_diagnoses_mistyped_pin() {
    let mut w = World::new(HashType::Sha256);
    let token = w.token.clone();
    let req = ClientRequest { identity: ID, pin: 1243, token: &token, permit: None, message: None, time: TIME };
    let out = client(&ClientConfig::default(), &req, &mut w.rng).unwrap();
    let d = pin_error(&ServerConfig::default(), &w.server_secret, &out.message).unwrap();
    assert_eq!(d, Some(9));
}

#[test]
fn multi_pass_exchange() {
    let mut w = World::new(HashType::Sha256);
    let token = w.token.clone();
    let tp = w.permit(HashType::Sha256, DATE);
    let cfg = ClientConfig::default();
    for (pin, expected) in [(1234, Ok(())), (4321, Err(VerifyErr::InvalidToken))] {
        let req = ClientRequest {
            identity: ID,
            pin,
            token: &token,
            permit: Some(PermitUse { date: DATE, permit: &tp }),
            message: None,
            time: 0,
        };
        let (state, commit) = client_1(&cfg, &req, &mut w.rng).unwrap();
        let y = server_challenge(&mut w.rng).unwrap();
        let proof = client_2(state, &y).unwrap();
        let res = server_2(&ServerConfig::default(), &w.server_secret, &commit, &y, &proof, DATE);
        assert_eq!(res.map(|_| ()), expected);
    }
}
