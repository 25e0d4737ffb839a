use crate::chain::Chain;
use tracing::debug;

/// Stable bottom-up merge sort over the forward view of `chain` starting at
/// its origin.
///
/// Runs of width 1, 2, 4, ... are merged pass by pass by rewriting `next`
/// keys only; every walk is bounded by counts, so the stale `next` of the
/// current tail is never followed. A final pass restores the `prev` keys and
/// closes the cycle. The origin becomes the smallest link and the cursor stays
/// on its link.
pub(crate) fn merge_sort<T, F>(chain: &mut Chain<T>, mut less: F)
where
    F: FnMut(&Option<T>, &Option<T>) -> bool,
{
    let len = chain.len();
    let orig = match chain.orig {
        Some(orig) if len >= 2 => orig,
        _ => return,
    };
    let (mut front, mut width, mut passes) = (orig, 1_usize, 0_usize);
    while width < len {
        front = merge_pass(chain, front, len, width, &mut less);
        width = width.saturating_mul(2);
        passes += 1;
    }
    relink_prev(chain, front, len);
    chain.orig = Some(front);
    debug!(len, passes, "sorted chain");
}

fn merge_pass<T, F>(
    chain: &mut Chain<T>,
    front: usize,
    len: usize,
    width: usize,
    less: &mut F,
) -> usize
where
    F: FnMut(&Option<T>, &Option<T>) -> bool,
{
    let (mut merged_front, mut merged_back) = (None, front);
    let (mut left, mut remaining) = (front, len);
    while remaining > 0 {
        let mut left_len = width.min(remaining);
        remaining -= left_len;
        let mut right_len = width.min(remaining);
        remaining -= right_len;
        let mut right = if right_len > 0 {
            advance(chain, left, left_len)
        } else {
            left
        };
        while left_len > 0 || right_len > 0 {
            // Only a strictly smaller right link may overtake the left run,
            // which keeps equal links in their original order.
            let take_right = left_len == 0
                || (right_len > 0
                    && less(&chain.links[right].payload, &chain.links[left].payload));
            let key = if take_right {
                let next = chain.next_key(right);
                right_len -= 1;
                std::mem::replace(&mut right, next)
            } else {
                let next = chain.next_key(left);
                left_len -= 1;
                std::mem::replace(&mut left, next)
            };
            match merged_front {
                Some(_) => chain.links[merged_back].next = key,
                None => merged_front = Some(key),
            }
            merged_back = key;
        }
        left = right;
    }
    merged_front.unwrap_or(front)
}

fn advance<T>(chain: &Chain<T>, mut key: usize, steps: usize) -> usize {
    for _ in 0..steps {
        key = chain.next_key(key);
    }
    key
}

fn relink_prev<T>(chain: &mut Chain<T>, front: usize, len: usize) {
    let (mut prev, mut key) = (front, chain.next_key(front));
    for _ in 1..len {
        chain.links[key].prev = prev;
        prev = key;
        key = chain.next_key(key);
    }
    chain.connect(prev, front);
}
