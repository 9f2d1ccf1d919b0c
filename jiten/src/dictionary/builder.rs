//! システム辞書のビルダー
//!
//! このモジュールは、語彙エントリ([`Token`])の列から辞書イメージを構築する
//! [`SystemDictionaryBuilder`]を提供します。構築は同期的な多段パスで、
//! 後段のパスの正しさは前段に依存するため、順序は固定です:
//!
//! 1. 読みでグループ化し、値の種別を判定する
//! 2. 頻出品詞表を構築する
//! 3. 値トライを構築し、idを解決する
//! 4. 各グループ内のトークンを並べ替える
//! 5. コスト・品詞・値の符号化形式を決める
//! 6. キートライを構築し、idを解決する
//! 7. トークン配列を構築する
//!
//! 最後に4つのセクション(値トライ・キートライ・トークン配列・頻出品詞表)を
//! ファイル符号化器へ渡してイメージを書き出します。

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use hashbrown::HashSet;

use crate::dictionary::codec::{DictionaryCodec, SystemDictionaryCodec};
use crate::dictionary::file_codec::{DictionaryFileCodec, DictionaryFileSection};
use crate::dictionary::word_info::{CostType, KeyInfo, PosType, TokenInfo, ValueType};
use crate::dictionary::Token;
use crate::errors::{JitenError, Result};
use crate::storage::{BitVectorBasedArrayBuilder, LoudsTrieBuilder};
use crate::utils::{char_count, hiragana_to_katakana};

/// 頻出品詞表のスロット数
const FREQUENT_POS_SLOTS: usize = 256;

/// 頻出品詞表が収容できる品詞対の最大数
const MAX_FREQUENT_POS: usize = 255;

/// ビルダーの構成オプション
#[derive(Debug, Clone)]
pub struct BuilderOptions {
    /// 各セクションを個別のファイルにも書き出すかどうか
    ///
    /// デバッグ用途です。最終イメージには影響しません。
    pub preserve_intermediate_dictionary: bool,

    /// 1バイトコスト符号化を有効にする最小の読み長(文字数)
    pub min_key_length_to_use_small_cost_encoding: usize,
}

impl Default for BuilderOptions {
    fn default() -> Self {
        Self {
            preserve_intermediate_dictionary: false,
            min_key_length_to_use_small_cost_encoding: 6,
        }
    }
}

/// システム辞書を構築するビルダー
///
/// 1回の構築につき1つ作成します。[`build_from_tokens()`](Self::build_from_tokens)が
/// 全パスを実行し、[`write_to_file()`](Self::write_to_file)または
/// [`write_to_stream()`](Self::write_to_stream)がイメージを書き出します。
pub struct SystemDictionaryBuilder<C = SystemDictionaryCodec> {
    value_trie_builder: LoudsTrieBuilder,
    key_trie_builder: LoudsTrieBuilder,
    token_array_builder: BitVectorBasedArrayBuilder,
    // Combined pos -> compact id, ordered by combined pos.
    frequent_pos: BTreeMap<u32, u32>,
    codec: C,
    file_codec: DictionaryFileCodec,
    options: BuilderOptions,
}

impl SystemDictionaryBuilder<SystemDictionaryCodec> {
    /// 既定の符号化器とオプションでビルダーを作成します。
    pub fn new() -> Self {
        Self::with_codec(SystemDictionaryCodec::new(), BuilderOptions::default())
    }

    /// 既定の符号化器と指定のオプションでビルダーを作成します。
    pub fn with_options(options: BuilderOptions) -> Self {
        Self::with_codec(SystemDictionaryCodec::new(), options)
    }
}

impl Default for SystemDictionaryBuilder<SystemDictionaryCodec> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> SystemDictionaryBuilder<C>
where
    C: DictionaryCodec,
{
    /// 指定の符号化器とオプションでビルダーを作成します。
    pub fn with_codec(codec: C, options: BuilderOptions) -> Self {
        Self {
            value_trie_builder: LoudsTrieBuilder::new(),
            key_trie_builder: LoudsTrieBuilder::new(),
            token_array_builder: BitVectorBasedArrayBuilder::new(),
            frequent_pos: BTreeMap::new(),
            codec,
            file_codec: DictionaryFileCodec::new(),
            options,
        }
    }

    /// 語彙エントリの列から辞書を構築します。
    ///
    /// 入力の順序に仮定はありません(内部で安定ソートされます)。
    ///
    /// # エラー
    ///
    /// 空の読みまたは表層形を持つエントリ、および内部の事後条件違反で
    /// エラーを返します。
    pub fn build_from_tokens(&mut self, tokens: &[Token]) -> Result<()> {
        let mut key_info_list = self.read_tokens(tokens)?;

        self.build_frequent_pos(&key_info_list)?;
        self.build_value_trie(&key_info_list)?;
        self.set_id_for_value(&mut key_info_list)?;
        self.sort_token_info(&mut key_info_list);
        self.set_cost_type(&mut key_info_list);
        self.set_pos_type(&mut key_info_list);
        self.set_value_type(&mut key_info_list);
        self.build_key_trie(&key_info_list)?;
        self.set_id_for_key(&mut key_info_list)?;
        self.build_token_array(&key_info_list)
    }

    /// 構築済みイメージをファイルへ書き出します。
    ///
    /// `preserve_intermediate_dictionary`が有効な場合、出力パスを基底として
    /// `.value` / `.key` / `.tokens` / `.freq_pos`の各ファイルも書き出します。
    pub fn write_to_file<P>(&self, output: P) -> Result<()>
    where
        P: AsRef<Path>,
    {
        let output = output.as_ref();
        let mut file = File::create(output)?;
        self.write_to_stream(Some(output), &mut file)
    }

    /// 構築済みイメージをストリームへ書き出します。
    ///
    /// # 引数
    ///
    /// * `intermediate_base` - 中間ファイルの基底パス。Noneなら中間ファイルは
    ///   書き出されません。
    /// * `writer` - 出力ストリーム
    pub fn write_to_stream<W>(&self, intermediate_base: Option<&Path>, writer: &mut W) -> Result<()>
    where
        W: Write,
    {
        let mut frequent_pos_array = [0u32; FREQUENT_POS_SLOTS];
        for (&pos, &idx) in &self.frequent_pos {
            frequent_pos_array[idx as usize] = pos;
        }
        let mut frequent_pos_image = Vec::with_capacity(FREQUENT_POS_SLOTS * 4);
        for v in frequent_pos_array {
            frequent_pos_image.extend_from_slice(&v.to_le_bytes());
        }

        let sections = [
            DictionaryFileSection::new(
                self.codec.section_name_for_value(),
                self.value_trie_builder.image(),
            ),
            DictionaryFileSection::new(
                self.codec.section_name_for_key(),
                self.key_trie_builder.image(),
            ),
            DictionaryFileSection::new(
                self.codec.section_name_for_tokens(),
                self.token_array_builder.image(),
            ),
            DictionaryFileSection::new(self.codec.section_name_for_pos(), &frequent_pos_image),
        ];

        if self.options.preserve_intermediate_dictionary {
            if let Some(base) = intermediate_base {
                for (section, ext) in sections
                    .iter()
                    .zip([".value", ".key", ".tokens", ".freq_pos"])
                {
                    write_section_to_file(section, base, ext)?;
                }
            }
        }

        self.file_codec.write_sections(&sections, writer)
    }

    /// 頻出品詞表(合成品詞 → コンパクトid)を返します。
    pub fn frequent_pos(&self) -> &BTreeMap<u32, u32> {
        &self.frequent_pos
    }

    // Pass A: group tokens by key and classify value types.
    fn read_tokens<'a>(&self, tokens: &'a [Token]) -> Result<Vec<KeyInfo<'a>>> {
        for (i, token) in tokens.iter().enumerate() {
            if token.key.is_empty() {
                return Err(JitenError::invalid_argument(
                    "tokens",
                    format!("empty key string in input at record {i}"),
                ));
            }
            if token.value.is_empty() {
                return Err(JitenError::invalid_argument(
                    "tokens",
                    format!("empty value string in input at record {i}"),
                ));
            }
        }
        // The sort must be stable: the same-as-prev passes depend on the
        // input order of tokens within one key.
        let mut sorted: Vec<&Token> = tokens.iter().collect();
        sorted.sort_by(|a, b| a.key.cmp(&b.key));

        let mut key_info_list: Vec<KeyInfo<'a>> = Vec::new();
        for token in sorted {
            match key_info_list.last_mut() {
                Some(last) if last.key == token.key => {}
                _ => key_info_list.push(KeyInfo::new(&token.key)),
            }
            let mut info = TokenInfo::new(token);
            info.value_type = classify_value_type(token);
            key_info_list.last_mut().unwrap().tokens.push(info);
        }
        Ok(key_info_list)
    }

    // Pass B: select the most frequent pos pairs, at most 255 of them.
    fn build_frequent_pos(&mut self, key_info_list: &[KeyInfo<'_>]) -> Result<()> {
        let mut pos_map: BTreeMap<u32, usize> = BTreeMap::new();
        for key_info in key_info_list {
            for info in &key_info.tokens {
                *pos_map.entry(info.token.combined_pos()).or_insert(0) += 1;
            }
        }

        // Histogram of "how many distinct pos pairs occur exactly f times",
        // then accumulate buckets from the highest frequency down.
        let mut freq_map: BTreeMap<usize, usize> = BTreeMap::new();
        for &count in pos_map.values() {
            *freq_map.entry(count).or_insert(0) += 1;
        }
        let mut num_freq_pos = 0usize;
        let mut freq_threshold = usize::MAX;
        for (&freq, &num_pairs) in freq_map.iter().rev() {
            if num_freq_pos + num_pairs > MAX_FREQUENT_POS {
                break;
            }
            freq_threshold = freq;
            num_freq_pos += num_pairs;
        }

        // Compact ids follow the ascending combined-pos order.
        let mut freq_pos_idx = 0u32;
        for (&pos, &count) in &pos_map {
            if count >= freq_threshold {
                self.frequent_pos.insert(pos, freq_pos_idx);
                freq_pos_idx += 1;
            }
        }
        if freq_pos_idx as usize != num_freq_pos {
            return Err(JitenError::invalid_state(
                "SystemDictionaryBuilder::build_frequent_pos",
                "inconsistent result to find frequent pos",
            ));
        }
        Ok(())
    }

    // Pass C: insert every stored surface form into the value trie.
    fn build_value_trie(&mut self, key_info_list: &[KeyInfo<'_>]) -> Result<()> {
        let mut encoded = Vec::new();
        for key_info in key_info_list {
            for info in &key_info.tokens {
                if matches!(
                    info.value_type,
                    ValueType::AsIsHiragana | ValueType::AsIsKatakana
                ) {
                    // These values are reconstructed from the key at lookup
                    // time and carried as flags in the token array.
                    continue;
                }
                encoded.clear();
                self.codec.encode_value(&info.token.value, &mut encoded)?;
                self.value_trie_builder.add(&encoded)?;
            }
        }
        self.value_trie_builder.build()
    }

    // Pass D: resolve value trie ids.
    fn set_id_for_value(&self, key_info_list: &mut [KeyInfo<'_>]) -> Result<()> {
        let mut encoded = Vec::new();
        for key_info in key_info_list {
            for info in &mut key_info.tokens {
                if matches!(
                    info.value_type,
                    ValueType::AsIsHiragana | ValueType::AsIsKatakana
                ) {
                    continue;
                }
                encoded.clear();
                self.codec.encode_value(&info.token.value, &mut encoded)?;
                info.id_in_value_trie = Some(self.value_trie_builder.get_id(&encoded)?);
            }
        }
        Ok(())
    }

    // Pass E: order tokens so that equal pos pairs and equal values become
    // adjacent, maximizing the same-as-prev encodings.
    fn sort_token_info(&self, key_info_list: &mut [KeyInfo<'_>]) {
        for key_info in key_info_list {
            key_info.tokens.sort_by_key(|info| {
                (
                    std::cmp::Reverse(info.token.lid),
                    std::cmp::Reverse(info.token.rid),
                    info.id_in_value_trie.unwrap_or(0),
                    info.token.attributes,
                )
            });
        }
    }

    // Pass F: enable the one-byte cost form for long keys, unless the key
    // has homonyms within one pos pair (their costs would alias).
    fn set_cost_type(&self, key_info_list: &mut [KeyInfo<'_>]) {
        for key_info in key_info_list {
            if has_homonyms_in_same_pos(key_info) {
                continue;
            }
            let key_len = char_count(key_info.key);
            if key_len < self.options.min_key_length_to_use_small_cost_encoding {
                continue;
            }
            for info in &mut key_info.tokens {
                // The one-byte form keeps only the upper half of the cost
                // and cannot represent negative values.
                if info.token.cost >= 0 {
                    info.cost_type = CostType::CanUseSmallEncoding;
                }
            }
        }
    }

    // Pass G: intern frequent pos pairs, then collapse runs of one pos.
    fn set_pos_type(&self, key_info_list: &mut [KeyInfo<'_>]) {
        for key_info in key_info_list {
            let mut prev_pos = None;
            for info in &mut key_info.tokens {
                let pos = info.token.combined_pos();
                if let Some(&idx) = self.frequent_pos.get(&pos) {
                    info.pos_type = PosType::FrequentPos;
                    info.id_in_frequent_pos_map = Some(idx as u8);
                }
                if prev_pos == Some(pos) {
                    // Denser than the frequent-pos form, so it wins.
                    info.pos_type = PosType::SameAsPrevPos;
                }
                prev_pos = Some(pos);
            }
        }
    }

    // Pass H: collapse runs of one value. The as-is flags already encode the
    // value for free and are never overwritten.
    fn set_value_type(&self, key_info_list: &mut [KeyInfo<'_>]) {
        for key_info in key_info_list {
            for i in 1..key_info.tokens.len() {
                let prev_value = &key_info.tokens[i - 1].token.value;
                let info = &key_info.tokens[i];
                if info.value_type == ValueType::DefaultValue && &info.token.value == prev_value {
                    key_info.tokens[i].value_type = ValueType::SameAsPrevValue;
                }
            }
        }
    }

    // Pass I, first half: insert every key into the key trie.
    fn build_key_trie(&mut self, key_info_list: &[KeyInfo<'_>]) -> Result<()> {
        let mut encoded = Vec::new();
        for key_info in key_info_list {
            encoded.clear();
            self.codec.encode_key(key_info.key, &mut encoded)?;
            self.key_trie_builder.add(&encoded)?;
        }
        self.key_trie_builder.build()
    }

    // Pass I, second half: resolve key trie ids.
    fn set_id_for_key(&self, key_info_list: &mut [KeyInfo<'_>]) -> Result<()> {
        let mut encoded = Vec::new();
        for key_info in key_info_list {
            encoded.clear();
            self.codec.encode_key(key_info.key, &mut encoded)?;
            key_info.id_in_key_trie = Some(self.key_trie_builder.get_id(&encoded)?);
        }
        Ok(())
    }

    // Pass J: emit one token record per key, in key trie id order, and close
    // the array with the termination sentinel.
    fn build_token_array(&mut self, key_info_list: &[KeyInfo<'_>]) -> Result<()> {
        // Reverse lookup table: id_in_key_trie -> KeyInfo. Ids are dense in
        // 0..N-1; anything else is a programming error.
        let mut id_to_key_info: Vec<Option<&KeyInfo<'_>>> = vec![None; key_info_list.len()];
        for key_info in key_info_list {
            let id = key_info.id_in_key_trie.ok_or_else(|| {
                JitenError::invalid_state(
                    "SystemDictionaryBuilder::build_token_array",
                    "key info without a key trie id",
                )
            })? as usize;
            let slot = id_to_key_info.get_mut(id).ok_or_else(|| {
                JitenError::invalid_state(
                    "SystemDictionaryBuilder::build_token_array",
                    format!("key trie id {id} out of range"),
                )
            })?;
            if slot.is_some() {
                return Err(JitenError::invalid_state(
                    "SystemDictionaryBuilder::build_token_array",
                    format!("key trie id {id} assigned twice"),
                ));
            }
            *slot = Some(key_info);
        }

        let mut record = Vec::new();
        for slot in &id_to_key_info {
            let key_info = slot.ok_or_else(|| {
                JitenError::invalid_state(
                    "SystemDictionaryBuilder::build_token_array",
                    "key trie ids are not dense",
                )
            })?;
            record.clear();
            self.codec.encode_tokens(&key_info.tokens, &mut record)?;
            self.token_array_builder.add(&record)?;
        }
        self.token_array_builder
            .add(&[self.codec.tokens_termination_flag()])?;
        self.token_array_builder.build()
    }
}

fn classify_value_type(token: &Token) -> ValueType {
    if token.value == token.key {
        return ValueType::AsIsHiragana;
    }
    if token.value == hiragana_to_katakana(&token.key) {
        return ValueType::AsIsKatakana;
    }
    ValueType::DefaultValue
}

fn has_homonyms_in_same_pos(key_info: &KeyInfo<'_>) -> bool {
    // Early exit path mainly for performance.
    if key_info.tokens.len() == 1 {
        return false;
    }
    let mut seen = HashSet::with_capacity(key_info.tokens.len());
    key_info
        .tokens
        .iter()
        .any(|info| !seen.insert(info.token.combined_pos()))
}

fn write_section_to_file(
    section: &DictionaryFileSection<'_>,
    base: &Path,
    extension: &str,
) -> Result<()> {
    let mut path = OsString::from(base.as_os_str());
    path.push(extension);
    let mut file = File::create(&path)?;
    file.write_all(section.data)?;
    Ok(())
}
