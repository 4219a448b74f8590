//! Two-authority setup shared by the protocol unit tests.

use mpin_primitives::HashType;

use crate::{
    hashers::hash_id,
    permit::client_permit_share,
    rng::{test_seed, Csprng},
    sharing::{client_secret_share, random_generate, recombine_g1, recombine_g2, server_secret_share},
    token::extract_pin,
    types::{MasterSecretShare, ServerSecret, TimePermit, Token},
};

pub const IDENTITY: &[u8] = b"testuser@miracl.com";
pub const PIN: u32 = 1234;
pub const DATE: u32 = 20_000;
pub const TIME: u32 = DATE * 86_400 + 3_600;

pub struct Fixture {
    pub hash_type: HashType,
    pub masters: [MasterSecretShare; 2],
    pub server: ServerSecret,
    pub token: Token,
    pub rng: Csprng,
}

impl Fixture {
    pub fn new(hash_type: HashType) -> Self {
        let mut rng = Csprng::from_seed(&test_seed()).unwrap();
        let masters = [random_generate(&mut rng).unwrap(), random_generate(&mut rng).unwrap()];
        let server = recombine_g2(
            &server_secret_share(&masters[0]).unwrap(),
            &server_secret_share(&masters[1]).unwrap(),
        )
        .unwrap();
        let hid = hash_id(hash_type, IDENTITY).unwrap();
        let cs = recombine_g1(
            &client_secret_share(&masters[0], &hid).unwrap(),
            &client_secret_share(&masters[1], &hid).unwrap(),
        )
        .unwrap();
        let token = extract_pin(hash_type, IDENTITY, PIN, &cs).unwrap();
        Self { hash_type, masters, server, token, rng }
    }

    pub fn permit(&self, date: u32) -> TimePermit {
        let hid = hash_id(self.hash_type, IDENTITY).unwrap();
        recombine_g1(
            &client_permit_share(self.hash_type, date, &self.masters[0], &hid).unwrap(),
            &client_permit_share(self.hash_type, date, &self.masters[1], &hid).unwrap(),
        )
        .unwrap()
    }
}
