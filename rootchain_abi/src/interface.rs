//! The registry of a contract's callable entries, built from its interface
//! description.

use std::{
    collections::{BTreeMap, HashMap},
    io::Read,
};

use log::{debug, warn};
use serde_json::{Map, Value};

use crate::{
    decoder::decode,
    encoder::encode,
    error::{AbiError, AbiResult},
    param_type::ParamType,
    signature::{selector, signature, Selector},
    token::Token,
};

/// The registry key under which the constructor is recorded.
pub const CONSTRUCTOR_KEY: &str = "constructor";

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum EntryKind {
    Function,
    Constructor,
}

/// A declared input of an entry.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Param {
    /// May be empty; names play no part in encoding.
    pub name: String,
    pub kind: ParamType,
}

/// A function or the constructor.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Entry {
    pub kind: EntryKind,
    /// Empty for the constructor.
    pub name: String,
    pub inputs: Vec<Param>,
}

impl Entry {
    pub fn input_types(&self) -> Vec<ParamType> {
        self.inputs.iter().map(|p| p.kind.clone()).collect()
    }

    /// The canonical parameter list, e.g. `(bytes32,uint256,bytes32,bytes)`.
    pub fn signature(&self) -> String {
        signature(self.inputs.iter().map(|p| &p.kind))
    }

    /// The name followed by [`Entry::signature`].
    pub fn full_signature(&self) -> String {
        format!("{}{}", self.name, self.signature())
    }

    /// The selector of a function. The constructor has none.
    pub fn selector(&self) -> Option<Selector> {
        match self.kind {
            EntryKind::Function => Some(selector(&self.name, &self.signature())),
            EntryKind::Constructor => None,
        }
    }

    /// Encodes a call to this entry: the selector followed by the encoded
    /// arguments. Constructor arguments are encoded without a prefix, ready to
    /// be appended to the init code.
    pub fn encode_input(&self, tokens: &[Token]) -> AbiResult<Vec<u8>> {
        let args = encode(&self.input_types(), tokens)?;
        Ok(match self.selector() {
            Some(selector) => [&selector.0[..], &args[..]].concat(),
            None => args,
        })
    }

    /// The inverse of [`Entry::encode_input`]. For functions, `data` must start
    /// with this entry's selector.
    pub fn decode_input(&self, data: &[u8]) -> AbiResult<Vec<Token>> {
        let args = match self.selector() {
            Some(selector) => data.strip_prefix(&selector.0[..]).ok_or_else(|| {
                AbiError::InvalidData(format!(
                    "call data does not start with the selector {} of `{}`",
                    selector, self.name
                ))
            })?,
            None => data,
        };
        decode(&self.input_types(), args)
    }
}

/// Functions of a contract by name, plus its constructor.
///
/// Built once from the interface description and immutable afterwards. Entry
/// kinds other than functions and the constructor (events, errors, `fallback`,
/// `receive`) are skipped. If a function name appears more than once the last
/// definition wins.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Interface {
    entries: BTreeMap<String, Entry>,
    selectors: HashMap<Selector, String>,
}

impl Interface {
    /// Parses a JSON array of interface entries.
    pub fn from_json_str(json: &str) -> AbiResult<Self> {
        Self::from_value(&serde_json::from_str(json)?)
    }

    pub fn from_reader<R: Read>(reader: R) -> AbiResult<Self> {
        Self::from_value(&serde_json::from_reader(reader)?)
    }

    /// Reads the interface of `contract` from the compiler's combined JSON
    /// output. `contract` is either the full key (`RootChain.sol:RootChain`)
    /// or just the contract name. The interface itself may be stored as an
    /// array or as a JSON-encoded string.
    pub fn from_combined_json(json: &str, contract: &str) -> AbiResult<Self> {
        let value: Value = serde_json::from_str(json)?;
        let contracts = value
            .get("contracts")
            .and_then(Value::as_object)
            .ok_or_else(|| malformed("combined JSON has no `contracts` object"))?;

        let compiled = find_contract(contracts, contract)?;
        match compiled.get("abi") {
            Some(Value::String(abi)) => Self::from_json_str(abi),
            Some(abi @ Value::Array(_)) => Self::from_value(abi),
            Some(_) => Err(malformed(format!(
                "`abi` of `{}` is neither an array nor a string",
                contract
            ))),
            None => Err(malformed(format!("contract `{}` has no `abi`", contract))),
        }
    }

    pub fn from_value(value: &Value) -> AbiResult<Self> {
        let records = value
            .as_array()
            .ok_or_else(|| malformed("interface description is not an array"))?;

        let mut interface = Self::default();
        let mut skipped = 0;
        for record in records {
            match parse_entry(record)? {
                Some(entry) => interface.insert(entry)?,
                None => skipped += 1,
            }
        }

        debug!(
            "Loaded interface with {} functions, {} constructor ({} entries skipped)",
            interface.selectors.len(),
            match interface.constructor() {
                Some(_) => "a",
                None => "no",
            },
            skipped
        );
        Ok(interface)
    }

    fn insert(&mut self, entry: Entry) -> AbiResult<()> {
        match entry.kind {
            EntryKind::Constructor => {
                if self.entries.contains_key(CONSTRUCTOR_KEY) {
                    return Err(malformed("more than one constructor"));
                }
                self.entries.insert(CONSTRUCTOR_KEY.to_owned(), entry);
            }
            EntryKind::Function => {
                let name = entry.name.clone();
                let new_selector = selector(&entry.name, &entry.signature());
                if let Some(old) = self.entries.insert(name.clone(), entry) {
                    warn!(
                        "Function `{}` is defined more than once, keeping the last definition",
                        old.full_signature()
                    );
                    let old_selector = selector(&old.name, &old.signature());
                    // A colliding function may have taken the selector over since.
                    if self.selectors.get(&old_selector) == Some(&old.name) {
                        self.selectors.remove(&old_selector);
                    }
                }
                if let Some(prev) = self.selectors.insert(new_selector, name.clone()) {
                    if prev != name {
                        warn!(
                            "Functions `{}` and `{}` share selector {}, calls with it decode as `{}`",
                            prev, name, new_selector, name
                        );
                    }
                }
            }
        }
        Ok(())
    }

    /// The function called `name`.
    pub fn function(&self, name: &str) -> AbiResult<&Entry> {
        self.entries
            .get(name)
            .filter(|e| e.kind == EntryKind::Function)
            .ok_or_else(|| AbiError::UnknownFunction(name.to_owned()))
    }

    /// Any entry by registry key, [`CONSTRUCTOR_KEY`] included.
    pub fn get(&self, key: &str) -> Option<&Entry> {
        self.entries.get(key)
    }

    pub fn constructor(&self) -> Option<&Entry> {
        self.entries.get(CONSTRUCTOR_KEY)
    }

    /// All functions, in name order.
    pub fn functions(&self) -> impl Iterator<Item = &Entry> {
        self.entries
            .values()
            .filter(|e| e.kind == EntryKind::Function)
    }

    pub fn function_by_selector(&self, selector: Selector) -> AbiResult<&Entry> {
        self.selectors
            .get(&selector)
            .and_then(|name| self.entries.get(name))
            .ok_or(AbiError::UnknownSelector(selector))
    }

    /// Encodes a call to function `name`.
    pub fn encode_call(&self, name: &str, tokens: &[Token]) -> AbiResult<Vec<u8>> {
        self.function(name)?.encode_input(tokens)
    }

    /// Encodes constructor arguments. A contract without a declared
    /// constructor takes none.
    pub fn encode_constructor(&self, tokens: &[Token]) -> AbiResult<Vec<u8>> {
        match self.constructor() {
            Some(entry) => entry.encode_input(tokens),
            None => encode(&[], tokens),
        }
    }

    /// Resolves the function called by `data` and decodes its arguments.
    pub fn decode_call(&self, data: &[u8]) -> AbiResult<(&Entry, Vec<Token>)> {
        let selector = match data {
            [a, b, c, d, ..] => Selector([*a, *b, *c, *d]),
            _ => {
                return Err(AbiError::InvalidData(format!(
                    "call data of {} bytes has no selector",
                    data.len()
                )))
            }
        };
        let entry = self.function_by_selector(selector)?;
        Ok((entry, entry.decode_input(data)?))
    }
}

fn malformed(msg: impl Into<String>) -> AbiError {
    AbiError::MalformedInterface(msg.into())
}

fn find_contract<'a>(contracts: &'a Map<String, Value>, contract: &str) -> AbiResult<&'a Value> {
    if let Some(compiled) = contracts.get(contract) {
        return Ok(compiled);
    }

    let suffix = format!(":{}", contract);
    let mut matches = contracts.iter().filter(|(key, _)| key.ends_with(&suffix));
    match (matches.next(), matches.next()) {
        (Some((_, compiled)), None) => Ok(compiled),
        (Some((first, _)), Some((second, _))) => Err(malformed(format!(
            "contract name `{}` is ambiguous: `{}`, `{}`",
            contract, first, second
        ))),
        (None, _) => Err(AbiError::UnknownContract(contract.to_owned())),
    }
}

fn field<'a>(record: &'a Map<String, Value>, key: &str) -> AbiResult<Option<&'a str>> {
    match record.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(other) => Err(malformed(format!("`{}` is not a string: {}", key, other))),
    }
}

fn as_record(value: &Value) -> AbiResult<&Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| malformed(format!("expected an object, found {}", value)))
}

/// Parses one interface record, or `None` for the kinds that are skipped.
fn parse_entry(value: &Value) -> AbiResult<Option<Entry>> {
    let record = as_record(value)?;
    let kind = field(record, "type")?
        .ok_or_else(|| malformed(format!("entry without `type`: {}", value)))?;

    let (kind, name) = match kind {
        "function" => match field(record, "name")? {
            Some(name) if !name.is_empty() => (EntryKind::Function, name.to_owned()),
            _ => return Err(malformed(format!("function without a name: {}", value))),
        },
        "constructor" => (EntryKind::Constructor, String::new()),
        _ => return Ok(None),
    };

    let inputs = match record.get("inputs") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(inputs)) => inputs.iter().map(parse_param).collect::<AbiResult<_>>()?,
        Some(other) => return Err(malformed(format!("`inputs` is not an array: {}", other))),
    };

    Ok(Some(Entry { kind, name, inputs }))
}

fn parse_param(value: &Value) -> AbiResult<Param> {
    let record = as_record(value)?;
    let kind = field(record, "type")?
        .ok_or_else(|| malformed(format!("parameter without `type`: {}", value)))?;
    let name = field(record, "name")?.unwrap_or_default().to_owned();

    let components = match record.get("components") {
        None | Some(Value::Null) => None,
        Some(Value::Array(components)) => Some(
            components
                .iter()
                .map(|c| parse_param(c).map(|p| p.kind))
                .collect::<AbiResult<Vec<_>>>()?,
        ),
        Some(other) => {
            return Err(malformed(format!("`components` is not an array: {}", other)))
        }
    };

    Ok(Param {
        name,
        kind: ParamType::from_abi(kind, components)?,
    })
}
