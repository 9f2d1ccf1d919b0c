//! 構築パス中の語彙エントリの中間表現
//!
//! [`TokenInfo`]は[`Token`]に符号化判断を付加したもの、[`KeyInfo`]は同じ
//! 読みを共有するトークンのグループです。どちらも1回の構築の中でだけ
//! 生存します。

use crate::dictionary::Token;

/// 値(表層形)の符号化形式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    /// 値トライのidを保存する
    DefaultValue,
    /// 直前のトークンと同じ値なので省略する
    SameAsPrevValue,
    /// 値が読みと一致するためフラグのみ保存する
    AsIsHiragana,
    /// 値が読みのカタカナ変換と一致するためフラグのみ保存する
    AsIsKatakana,
}

/// 品詞の符号化形式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PosType {
    /// 左右IDをそのまま保存する
    DefaultPos,
    /// 頻出品詞表のidを保存する
    FrequentPos,
    /// 直前のトークンと同じ品詞なので省略する
    SameAsPrevPos,
}

/// コストの符号化形式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CostType {
    /// 2バイトで保存する
    DefaultCost,
    /// 1バイトの近似形式で保存する
    CanUseSmallEncoding,
}

/// 符号化判断を付加した語彙エントリ
#[derive(Debug, Clone)]
pub struct TokenInfo<'a> {
    pub token: &'a Token,
    pub value_type: ValueType,
    pub pos_type: PosType,
    pub cost_type: CostType,

    /// 値トライ内のid
    ///
    /// `value_type`がAS_IS系のときは値が読みから再構築できるためNoneです。
    pub id_in_value_trie: Option<u32>,

    /// 頻出品詞表内のid
    pub id_in_frequent_pos_map: Option<u8>,
}

impl<'a> TokenInfo<'a> {
    pub fn new(token: &'a Token) -> Self {
        Self {
            token,
            value_type: ValueType::DefaultValue,
            pos_type: PosType::DefaultPos,
            cost_type: CostType::DefaultCost,
            id_in_value_trie: None,
            id_in_frequent_pos_map: None,
        }
    }
}

/// 1つの読みを共有するトークンのグループ
#[derive(Debug)]
pub struct KeyInfo<'a> {
    pub key: &'a str,
    pub tokens: Vec<TokenInfo<'a>>,

    /// キートライ内のid
    ///
    /// キートライ構築後に割り当てられます。
    pub id_in_key_trie: Option<u32>,
}

impl<'a> KeyInfo<'a> {
    pub fn new(key: &'a str) -> Self {
        Self {
            key,
            tokens: Vec::new(),
            id_in_key_trie: None,
        }
    }
}
