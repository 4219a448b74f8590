//! Walk through issuance and one single-pass login with two authorities,
//! printing every intermediate value in hex.

use std::error::Error;

use mpin_engine::{
    client, client_permit_share, client_secret_share, encode_auth_message, extract_pin, hash_id,
    random_generate, recombine_g1, recombine_g2, rng::test_seed, server, server_secret_share, today,
    current_time, ClientConfig, ClientRequest, Csprng, PermitUse, ServerClock, ServerConfig,
};

fn main() -> Result<(), Box<dyn Error>> {
    let identity = b"testuser@miracl.com";
    let cfg = ClientConfig::default();
    let mut rng = Csprng::from_seed(&test_seed())?;

    let ms1 = random_generate(&mut rng)?;
    let ms2 = random_generate(&mut rng)?;
    let ss = recombine_g2(&server_secret_share(&ms1)?, &server_secret_share(&ms2)?)?;
    println!("Server Secret = {}", hex::encode(ss.as_bytes()));

    let hid = hash_id(cfg.hash_type, identity)?;
    println!("HASH_ID = {}", hex::encode(hid.as_bytes()));
    let cs = recombine_g1(&client_secret_share(&ms1, &hid)?, &client_secret_share(&ms2, &hid)?)?;
    println!("Client Secret = {}", hex::encode(cs.as_bytes()));

    let date = today();
    let tp = recombine_g1(
        &client_permit_share(cfg.hash_type, date, &ms1, &hid)?,
        &client_permit_share(cfg.hash_type, date, &ms2, &hid)?,
    )?;
    println!("Date = {date}");
    println!("Time Permit = {}", hex::encode(tp.as_bytes()));

    let token = extract_pin(cfg.hash_type, identity, 1234, &cs)?;
    println!("Token = {}", hex::encode(token.as_bytes()));

    for pin in [1234, 4321] {
        let req = ClientRequest {
            identity,
            pin,
            token: &token,
            permit: Some(PermitUse { date, permit: &tp }),
            message: None,
            time: current_time(),
        };
        let out = client(&cfg, &req, &mut rng)?;
        println!("PIN {pin}:");
        println!("  U = {}", hex::encode(out.message.ut.as_bytes()));
        println!("  V = {}", hex::encode(out.message.sec.as_bytes()));
        println!("  wire = {} bytes", encode_auth_message(&out.message)?.len());
        match server(&ServerConfig::for_client(cfg), &ss, &out.message, ServerClock::now()) {
            Ok(res) => println!("  Server says - PIN is good! (HID {})", hex::encode(res.hid.as_bytes())),
            Err(e) => println!("  Server says - {e} ({:?})", e.code()),
        }
    }
    Ok(())
}
