#![no_main]

use std::sync::OnceLock;

use libfuzzer_sys::fuzz_target;
use mpin_engine::{
    decode_auth_message, random_generate, recombine_g2, server, server_secret_share, Csprng,
    ServerClock, ServerConfig, ServerSecret, VerifyErr,
};

fn server_secret() -> &'static ServerSecret {
    static SECRET: OnceLock<ServerSecret> = OnceLock::new();
    SECRET.get_or_init(|| {
        let mut rng = Csprng::from_seed(&[9u8; 32]).expect("seed");
        let m1 = random_generate(&mut rng).expect("master");
        let m2 = random_generate(&mut rng).expect("master");
        recombine_g2(
            &server_secret_share(&m1).expect("share"),
            &server_secret_share(&m2).expect("share"),
        )
        .expect("recombine")
    })
}

fuzz_target!(|data: &[u8]| {
    let Ok(msg) = decode_auth_message(data) else { return };
    let clock = ServerClock { today: msg.date.unwrap_or(1), time: msg.time };
    // Random input must never authenticate.
    assert!(matches!(
        server(&ServerConfig::default(), server_secret(), &msg, clock),
        Err(VerifyErr::InvalidToken | VerifyErr::MalformedInput | VerifyErr::PermitExpired)
    ));
});
