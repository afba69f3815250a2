use std::io::Cursor;

use ethereum_types::{H160, U256};
use hex_literal::hex;
use plasma_smt::{config::SmtConfig, db::MemoryDb, proof::Proof, smt::Smt};
use rootchain_abi::{AbiError, EntryKind, Interface, Selector, Token};

const COMBINED_JSON: &str = include_str!("../test_data/contracts.json");

fn common_setup() {
    // Try init since multiple tests calling `init` will cause an error.
    let _ = pretty_env_logger::try_init();
}

fn rootchain() -> Interface {
    common_setup();
    Interface::from_combined_json(COMBINED_JSON, "RootChain.sol:RootChain").unwrap()
}

#[test]
fn loads_the_rootchain_interface() {
    let interface = rootchain();

    let names = interface
        .functions()
        .map(|f| f.name.as_str())
        .collect::<Vec<_>>();
    assert_eq!(
        names,
        vec![
            "authority",
            "checkMembership",
            "childBlockRoots",
            "coins",
            "deposit",
            "startExit",
            "submitBlock",
        ]
    );
    assert_eq!(
        interface.constructor().map(|c| c.kind),
        Some(EntryKind::Constructor)
    );
    assert!(matches!(
        interface.function("Deposit"),
        Err(AbiError::UnknownFunction(_))
    ));

    // The bare contract name resolves to the same entry.
    assert_eq!(
        Interface::from_combined_json(COMBINED_JSON, "RootChain").unwrap(),
        interface
    );
}

#[test]
fn known_selectors() {
    let interface = rootchain();

    for (name, full_signature, selector) in [
        ("deposit", "deposit()", hex!("d0e30db0")),
        ("authority", "authority()", hex!("bf7e214f")),
        ("coins", "coins(uint256)", hex!("c6610657")),
        ("childBlockRoots", "childBlockRoots(uint256)", hex!("38def2f5")),
        ("submitBlock", "submitBlock(bytes32)", hex!("baa47694")),
        (
            "checkMembership",
            "checkMembership(bytes32,uint256,bytes32,bytes)",
            hex!("6c8f455c"),
        ),
        (
            "startExit",
            "startExit((uint256,(address,address,uint256,uint256,bytes,bytes)))",
            hex!("183c3361"),
        ),
    ] {
        let entry = interface.function(name).unwrap();
        assert_eq!(entry.full_signature(), full_signature);
        assert_eq!(entry.selector(), Some(Selector(selector)), "{}", name);
        assert_eq!(interface.function_by_selector(Selector(selector)), Ok(entry));
    }
}

#[test]
fn abi_stored_as_array() {
    common_setup();
    let interface = Interface::from_combined_json(COMBINED_JSON, "SparseMerkleTree").unwrap();
    assert_eq!(interface.functions().count(), 1);
    assert!(interface.constructor().is_none());
    assert_eq!(
        interface.function("checkMembership").unwrap().selector(),
        Some(Selector(hex!("6c8f455c")))
    );

    assert_eq!(
        Interface::from_combined_json(COMBINED_JSON, "Missing"),
        Err(AbiError::UnknownContract("Missing".to_owned()))
    );
}

#[test]
fn loads_from_a_reader() {
    let interface = rootchain();

    let combined: serde_json::Value = serde_json::from_str(COMBINED_JSON).unwrap();
    let abi = combined["contracts"]["RootChain.sol:RootChain"]["abi"]
        .as_str()
        .unwrap();

    let from_reader = Interface::from_reader(Cursor::new(abi.as_bytes())).unwrap();
    assert_eq!(from_reader, Interface::from_json_str(abi).unwrap());
    assert_eq!(from_reader, interface);

    assert!(matches!(
        Interface::from_reader(&b"[{"[..]),
        Err(AbiError::MalformedInterface(_))
    ));
    assert!(matches!(
        Interface::from_reader(&br#"{"type":"function"}"#[..]),
        Err(AbiError::MalformedInterface(_))
    ));
}

#[test]
fn nested_tuple_call() {
    let interface = rootchain();
    let exit = Token::Tuple(vec![
        Token::from(0u64),
        Token::Tuple(vec![
            Token::Address(H160::repeat_byte(0x11)),
            Token::Address(H160::repeat_byte(0x22)),
            Token::from(0u64),
            Token::from(0u64),
            Token::Bytes(vec![]),
            Token::Bytes(vec![]),
        ]),
    ]);

    let data = interface.encode_call("startExit", &[exit.clone()]).unwrap();
    let expected = [
        &hex!("183c3361")[..],
        // Offset of the outer tuple.
        &hex!("0000000000000000000000000000000000000000000000000000000000000020"),
        &hex!("0000000000000000000000000000000000000000000000000000000000000000"),
        // Offset of the inner tuple, relative to the outer one.
        &hex!("0000000000000000000000000000000000000000000000000000000000000040"),
        &hex!("0000000000000000000000001111111111111111111111111111111111111111"),
        &hex!("0000000000000000000000002222222222222222222222222222222222222222"),
        &hex!("0000000000000000000000000000000000000000000000000000000000000000"),
        &hex!("0000000000000000000000000000000000000000000000000000000000000000"),
        &hex!("00000000000000000000000000000000000000000000000000000000000000c0"),
        &hex!("00000000000000000000000000000000000000000000000000000000000000e0"),
        &hex!("0000000000000000000000000000000000000000000000000000000000000000"),
        &hex!("0000000000000000000000000000000000000000000000000000000000000000"),
    ]
    .concat();
    assert_eq!(hex::encode(&data), hex::encode(&expected));

    let (entry, args) = interface.decode_call(&data).unwrap();
    assert_eq!(entry.name, "startExit");
    assert_eq!(args, vec![exit]);
}

#[test]
fn argument_counts() {
    let interface = rootchain();

    assert_eq!(
        interface.encode_call("deposit", &[]).unwrap(),
        hex!("d0e30db0")
    );
    assert_eq!(
        interface.encode_call("deposit", &[Token::from(5u64)]),
        Err(AbiError::ArityMismatch {
            expected: 0,
            found: 1
        })
    );

    let leaf = Token::FixedBytes(vec![0; 32]);
    let args = [
        leaf.clone(),
        Token::from(0u64),
        leaf.clone(),
        Token::Bytes(vec![]),
    ];
    let data = interface.encode_call("checkMembership", &args).unwrap();
    assert!(data.len() >= 4 + 32 * args.len());

    for n in [3, 5] {
        let mut wrong = args.to_vec();
        wrong.resize(n, leaf.clone());
        assert_eq!(
            interface.encode_call("checkMembership", &wrong),
            Err(AbiError::ArityMismatch {
                expected: 4,
                found: n
            })
        );
    }

    assert!(matches!(
        interface.encode_call("coins", &[Token::Bool(true)]),
        Err(AbiError::TypeMismatch { .. })
    ));
    assert_eq!(
        interface.encode_call("exit", &[]),
        Err(AbiError::UnknownFunction("exit".to_owned()))
    );
}

#[test]
fn membership_proof_round_trip() {
    let interface = rootchain();

    let config = SmtConfig::new(32);
    let leaves = [
        (U256::from(2), b"first coin".to_vec()),
        (U256::from(1) << 200, b"second coin".to_vec()),
    ];
    let smt = Smt::<MemoryDb>::new(config, leaves.clone()).unwrap();

    for (index, leaf) in leaves {
        let proof = smt.prove(index).unwrap();
        let data = interface
            .encode_call(
                "checkMembership",
                &[
                    Token::FixedBytes(config.leaf_digest(&leaf).unwrap().as_bytes().to_vec()),
                    Token::Uint(index),
                    Token::FixedBytes(smt.root().as_bytes().to_vec()),
                    Token::Bytes(proof.to_bytes()),
                ],
            )
            .unwrap();
        // Four head words, then the proof's length word and its 256 siblings.
        assert_eq!(data.len(), 4 + 4 * 32 + 32 + 256 * 32);

        // What the contract receives is enough to check membership again.
        let (_, args) = interface.decode_call(&data).unwrap();
        let index = *args[1].as_uint().unwrap();
        let proof_bytes = args[3].as_bytes().unwrap();
        let received = Proof::from_bytes(&config, index, proof_bytes).unwrap();
        assert_eq!(received, proof);
        assert!(received.verify(&config, &smt.root(), &leaf));
    }
}
