//! LOUDS符号化トライ
//!
//! このモジュールは、バイト列の集合からLOUDS(Level-Order Unary Degree
//! Sequence)符号化トライを構築するビルダーと、そのイメージの読み取り側を
//! 提供します。
//!
//! # イメージレイアウト
//!
//! ```text
//! [LOUDSビット列のバイト長: u32 LE]
//! [終端ビット列のバイト長: u32 LE]
//! [エッジラベルあたりのビット数: u32 LE、常に8]
//! [エッジラベル列のバイト長: u32 LE]
//! [LOUDSビット列 (4バイト詰め)]
//! [終端ビット列 (4バイト詰め)]
//! [エッジラベル列]
//! ```
//!
//! LOUDSビット列は擬似根の次数1を表す`10`で始まり、以降、各ノードの次数を
//! レベル順に単進符号(1がd個、続いて0)で並べます。擬似根グループの後の
//! i番目の1ビットがノードiへのエッジで、ノード0が根です。終端ビット列は
//! ノード番号順に1ビットずつ、エッジラベル列はノード番号順に1バイトずつ
//! (根はダミーの0x00)並びます。終端ノードのidは、終端ビット列上の
//! rank1、すなわちレベル順で数えた終端ノードの通し番号です。

use std::collections::VecDeque;

use crate::errors::{JitenError, Result};
use crate::storage::bit_vector::{BitVector, BitVectorBuilder};

const HEADER_LEN: usize = 16;
const BITS_PER_LABEL: u32 = 8;

/// LOUDSトライを構築するビルダー
///
/// 挿入された文字列集合を重複排除し、[`build()`](Self::build)でLOUDS
/// イメージへ確定します。確定後、各文字列は安定な整数idを持ち、
/// [`get_id()`](Self::get_id)で引けます。idの割り当ては決定的で、
/// 読み取り側のレベル順走査と一致します。
#[derive(Default)]
pub struct LoudsTrieBuilder {
    words: Vec<Vec<u8>>,
    // ids[i] is the id of words[i] after build (words sorted and deduped).
    ids: Vec<u32>,
    image: Vec<u8>,
    built: bool,
}

impl LoudsTrieBuilder {
    /// 新しいビルダーを作成します。
    pub fn new() -> Self {
        Self::default()
    }

    /// 符号化済み文字列を追加します。
    ///
    /// 重複挿入は冪等で、同じ文字列は同じidを受け取ります。
    ///
    /// # エラー
    ///
    /// 空文字列を渡した場合、または[`build()`](Self::build)後に呼んだ場合に
    /// エラーを返します。
    pub fn add(&mut self, word: &[u8]) -> Result<()> {
        if self.built {
            return Err(JitenError::invalid_state(
                "LoudsTrieBuilder::add",
                "the trie is already built",
            ));
        }
        if word.is_empty() {
            return Err(JitenError::invalid_argument(
                "word",
                "empty string cannot be stored in the trie",
            ));
        }
        self.words.push(word.to_vec());
        Ok(())
    }

    /// トライを確定します。これ以降の[`add()`](Self::add)はできません。
    pub fn build(&mut self) -> Result<()> {
        if self.built {
            return Err(JitenError::invalid_state(
                "LoudsTrieBuilder::build",
                "the trie is already built",
            ));
        }
        self.words.sort();
        self.words.dedup();
        let words = &self.words;
        self.ids = vec![0; words.len()];

        let mut louds = BitVectorBuilder::new();
        let mut terminal = BitVectorBuilder::new();
        let mut labels: Vec<u8> = Vec::with_capacity(words.len() + 1);

        // The super-root has the root as its single child.
        louds.push_bit(true);
        louds.push_bit(false);
        // The root carries a dummy label and is never terminal since empty
        // words are rejected in add().
        terminal.push_bit(false);
        labels.push(0);

        let mut next_id = 0u32;
        // Breadth-first over word ranges sharing a common prefix of `depth`.
        let mut queue: VecDeque<(usize, usize, usize)> = VecDeque::new();
        queue.push_back((0, words.len(), 0));
        while let Some((begin, end, depth)) = queue.pop_front() {
            let mut it = begin;
            // The shortest word of the range terminates at this node.
            if it < end && words[it].len() == depth {
                it += 1;
            }
            while it < end {
                let label = words[it][depth];
                let mut child_end = it + 1;
                while child_end < end && words[child_end][depth] == label {
                    child_end += 1;
                }
                louds.push_bit(true);
                labels.push(label);
                if words[it].len() == depth + 1 {
                    terminal.push_bit(true);
                    self.ids[it] = next_id;
                    next_id += 1;
                } else {
                    terminal.push_bit(false);
                }
                queue.push_back((it, child_end, depth + 1));
                it = child_end;
            }
            louds.push_bit(false);
        }

        let louds_bytes = louds.into_bytes();
        let terminal_bytes = terminal.into_bytes();
        self.image = Vec::with_capacity(
            HEADER_LEN + louds_bytes.len() + terminal_bytes.len() + labels.len(),
        );
        self.image
            .extend_from_slice(&(louds_bytes.len() as u32).to_le_bytes());
        self.image
            .extend_from_slice(&(terminal_bytes.len() as u32).to_le_bytes());
        self.image.extend_from_slice(&BITS_PER_LABEL.to_le_bytes());
        self.image
            .extend_from_slice(&(labels.len() as u32).to_le_bytes());
        self.image.extend_from_slice(&louds_bytes);
        self.image.extend_from_slice(&terminal_bytes);
        self.image.extend_from_slice(&labels);
        self.built = true;
        Ok(())
    }

    /// 追加済み文字列のidを返します。
    ///
    /// # エラー
    ///
    /// 未確定の場合、または文字列が追加されていなかった場合にエラーを
    /// 返します。
    pub fn get_id(&self, word: &[u8]) -> Result<u32> {
        if !self.built {
            return Err(JitenError::invalid_state(
                "LoudsTrieBuilder::get_id",
                "the trie is not built yet",
            ));
        }
        let idx = self
            .words
            .binary_search_by(|w| w.as_slice().cmp(word))
            .map_err(|_| {
                JitenError::invalid_argument("word", "the string was never added to the trie")
            })?;
        Ok(self.ids[idx])
    }

    /// 確定済みトライのLOUDSイメージを返します。未確定なら空です。
    pub fn image(&self) -> &[u8] {
        &self.image
    }

    /// 確定済みかどうかを返します。
    pub fn is_built(&self) -> bool {
        self.built
    }
}

/// LOUDSトライイメージの読み取り側
///
/// [`LoudsTrieBuilder`]が書き出したイメージを借用し、rank/select索引で
/// ナビゲートします。
pub struct LoudsTrie<'a> {
    louds: BitVector<'a>,
    terminal: BitVector<'a>,
    labels: &'a [u8],
}

impl<'a> LoudsTrie<'a> {
    /// イメージからトライを開きます。
    ///
    /// # エラー
    ///
    /// ヘッダやセクション長が不正な場合にエラーを返します。
    pub fn from_image(image: &'a [u8]) -> Result<Self> {
        if image.len() < HEADER_LEN {
            return Err(JitenError::invalid_format(
                "louds_trie",
                "image is shorter than the header",
            ));
        }
        let read_u32 =
            |i: usize| u32::from_le_bytes(image[i * 4..i * 4 + 4].try_into().unwrap()) as usize;
        let louds_len = read_u32(0);
        let terminal_len = read_u32(1);
        let bits_per_label = read_u32(2);
        let labels_len = read_u32(3);
        if bits_per_label != BITS_PER_LABEL as usize {
            return Err(JitenError::invalid_format(
                "louds_trie",
                format!("unsupported edge label width: {bits_per_label}"),
            ));
        }
        if HEADER_LEN + louds_len + terminal_len + labels_len != image.len() {
            return Err(JitenError::invalid_format(
                "louds_trie",
                "section lengths do not match the image size",
            ));
        }
        let louds_begin = HEADER_LEN;
        let terminal_begin = louds_begin + louds_len;
        let labels_begin = terminal_begin + terminal_len;
        Ok(Self {
            louds: BitVector::new(&image[louds_begin..terminal_begin]),
            terminal: BitVector::new(&image[terminal_begin..labels_begin]),
            labels: &image[labels_begin..],
        })
    }

    /// 格納されている文字列の総数を返します。
    pub fn num_words(&self) -> usize {
        self.terminal.num_ones()
    }

    /// 符号化済み文字列を検索し、格納されていればidを返します。
    pub fn exact_search(&self, word: &[u8]) -> Option<u32> {
        let mut node = 0usize;
        'next_label: for &label in word {
            let mut pos = self.louds.select0(node)? + 1;
            while self.louds.get(pos) {
                let child = self.louds.rank1(pos);
                if self.labels[child] == label {
                    node = child;
                    continue 'next_label;
                }
                pos += 1;
            }
            return None;
        }
        if self.terminal.get(node) {
            Some(self.terminal.rank1(node) as u32)
        } else {
            None
        }
    }

    /// 全文字列を`(符号化バイト列, id)`の組で列挙します。
    ///
    /// レベル順に走査するため、idは昇順で返ります。検証とテストのための
    /// 操作であり、変換クエリ用のAPIではありません。
    pub fn enumerate(&self) -> Vec<(Vec<u8>, u32)> {
        let mut out = Vec::with_capacity(self.num_words());
        let mut queue: VecDeque<(usize, Vec<u8>)> = VecDeque::new();
        queue.push_back((0, Vec::new()));
        while let Some((node, prefix)) = queue.pop_front() {
            if self.terminal.get(node) {
                out.push((prefix.clone(), self.terminal.rank1(node) as u32));
            }
            let mut pos = match self.louds.select0(node) {
                Some(p) => p + 1,
                None => break,
            };
            while self.louds.get(pos) {
                let child = self.louds.rank1(pos);
                let mut next = prefix.clone();
                next.push(self.labels[child]);
                queue.push_back((child, next));
                pos += 1;
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(words: &[&[u8]]) -> LoudsTrieBuilder {
        let mut builder = LoudsTrieBuilder::new();
        for w in words {
            builder.add(w).unwrap();
        }
        builder.build().unwrap();
        builder
    }

    #[test]
    fn test_single_word() {
        let builder = build(&[b"abc"]);
        assert_eq!(builder.get_id(b"abc").unwrap(), 0);
        let trie = LoudsTrie::from_image(builder.image()).unwrap();
        assert_eq!(trie.num_words(), 1);
        assert_eq!(trie.exact_search(b"abc"), Some(0));
        assert_eq!(trie.exact_search(b"ab"), None);
        assert_eq!(trie.exact_search(b"abcd"), None);
    }

    #[test]
    fn test_level_order_ids() {
        // Shorter words are reached earlier in the level-order traversal and
        // receive smaller ids than longer ones regardless of sort order.
        let builder = build(&[b"ab", b"a", b"b"]);
        assert_eq!(builder.get_id(b"a").unwrap(), 0);
        assert_eq!(builder.get_id(b"b").unwrap(), 1);
        assert_eq!(builder.get_id(b"ab").unwrap(), 2);
    }

    #[test]
    fn test_ids_match_reader() {
        let words: Vec<&[u8]> = vec![b"an", b"i", b"of", b"one", b"out", b"our"];
        let builder = build(&words);
        let trie = LoudsTrie::from_image(builder.image()).unwrap();
        assert_eq!(trie.num_words(), words.len());
        for w in &words {
            assert_eq!(trie.exact_search(w), Some(builder.get_id(w).unwrap()), "{w:?}");
        }
        // Dense ids covering 0..N-1.
        let mut ids: Vec<u32> = words.iter().map(|w| builder.get_id(w).unwrap()).collect();
        ids.sort_unstable();
        assert_eq!(ids, (0..words.len() as u32).collect::<Vec<_>>());
    }

    #[test]
    fn test_enumerate() {
        let words: Vec<&[u8]> = vec![b"an", b"i", b"of", b"one", b"out", b"our"];
        let builder = build(&words);
        let trie = LoudsTrie::from_image(builder.image()).unwrap();
        let listed = trie.enumerate();
        assert_eq!(listed.len(), words.len());
        for (bytes, id) in &listed {
            assert_eq!(builder.get_id(bytes).unwrap(), *id);
        }
        // Level order implies ascending ids.
        let ids: Vec<u32> = listed.iter().map(|(_, id)| *id).collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_duplicates_share_id() {
        let builder = build(&[b"kana", b"kana", b"kanji"]);
        let trie = LoudsTrie::from_image(builder.image()).unwrap();
        assert_eq!(trie.num_words(), 2);
        assert_eq!(
            builder.get_id(b"kana").unwrap(),
            trie.exact_search(b"kana").unwrap()
        );
    }

    #[test]
    fn test_empty_trie() {
        let mut builder = LoudsTrieBuilder::new();
        builder.build().unwrap();
        let trie = LoudsTrie::from_image(builder.image()).unwrap();
        assert_eq!(trie.num_words(), 0);
        assert_eq!(trie.exact_search(b"a"), None);
        assert!(trie.enumerate().is_empty());
    }

    #[test]
    fn test_add_after_build_fails() {
        let mut builder = build(&[b"a"]);
        assert!(builder.add(b"b").is_err());
    }

    #[test]
    fn test_get_id_unknown_word_fails() {
        let builder = build(&[b"a"]);
        assert!(builder.get_id(b"zz").is_err());
    }

    #[test]
    fn test_empty_word_rejected() {
        let mut builder = LoudsTrieBuilder::new();
        assert!(builder.add(b"").is_err());
    }

    #[test]
    fn test_binary_labels() {
        // Edge labels are raw bytes, including 0x00 and 0xff.
        let words: Vec<&[u8]> = vec![&[0x00, 0xff], &[0x00], &[0xfe, 0x30, 0x42]];
        let builder = build(&words);
        let trie = LoudsTrie::from_image(builder.image()).unwrap();
        for w in &words {
            assert_eq!(trie.exact_search(w), Some(builder.get_id(w).unwrap()));
        }
    }

    #[test]
    fn test_corrupt_header() {
        assert!(LoudsTrie::from_image(&[0, 1, 2]).is_err());
        let builder = build(&[b"a"]);
        let mut image = builder.image().to_vec();
        image[0] ^= 0xff;
        assert!(LoudsTrie::from_image(&image).is_err());
    }
}
