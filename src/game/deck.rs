//! 洗牌、发牌与弃牌堆回收。牌堆以 `Vec` 末尾为顶，摸牌即 `pop`。

use rand::seq::SliceRandom;
use rand::Rng;

use super::cards::Card;

/// 发牌结果。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deal {
    pub deck: Vec<Card>,
    pub hands: Vec<Vec<Card>>,
    pub discard_pile: Vec<Card>,
}

/// 返回 `cards` 的一个均匀随机排列（Fisher-Yates），不修改输入。
pub fn shuffle_deck<R: Rng + ?Sized>(cards: &[Card], rng: &mut R) -> Vec<Card> {
    let mut shuffled = cards.to_vec();
    shuffled.shuffle(rng);
    shuffled
}

/// 轮流给每位玩家发 `hand_size` 张（外层按张数、内层按玩家），再翻一张作为弃牌堆顶。
///
/// 牌不够时提前停止，不报错。
pub fn deal_cards(mut deck: Vec<Card>, num_players: usize, hand_size: usize) -> Deal {
    let mut hands: Vec<Vec<Card>> = (0..num_players)
        .map(|_| Vec::with_capacity(hand_size))
        .collect();

    'dealing: for _ in 0..hand_size {
        for hand in hands.iter_mut() {
            match deck.pop() {
                Some(card) => hand.push(card),
                None => break 'dealing,
            }
        }
    }

    let discard_pile = deck.pop().into_iter().collect();

    Deal {
        deck,
        hands,
        discard_pile,
    }
}

/// 把弃牌堆除顶牌外的牌洗回牌堆。弃牌堆不足两张时什么也不做，返回 `false`。
pub fn recycle_discard_pile<R: Rng + ?Sized>(
    deck: &mut Vec<Card>,
    discard_pile: &mut Vec<Card>,
    rng: &mut R,
) -> bool {
    if discard_pile.len() < 2 {
        return false;
    }
    let Some(top) = discard_pile.pop() else {
        return false;
    };
    let mut recycled = std::mem::take(discard_pile);
    recycled.shuffle(rng);
    deck.append(&mut recycled);
    discard_pile.push(top);
    true
}
