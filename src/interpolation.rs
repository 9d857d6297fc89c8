use itertools::{izip, Itertools};
use metfor::Quantity;
use optional::Optioned;
use std::ops::Sub;

/// Interpolate values given two parallel vectors of data and a target value, extrapolating along
/// the nearest end segment when the target lies outside the known values.
///
/// Points where `ys` is missing are skipped, so the points on either side of a gap are used.
/// Assumes that xs is monotonic. At least two known points are needed, otherwise the result is
/// missing.
pub fn linear_interpolate_or_extrapolate<X, Y>(
    xs: &[X],
    ys: &[Optioned<Y>],
    target_x: X,
) -> Optioned<Y>
where
    X: Quantity + Copy + PartialOrd + Sub<X> + std::fmt::Debug,
    <X as Sub<X>>::Output: Quantity,
    Y: Quantity + Copy + optional::Noned + Sub<Y>,
    <Y as Sub<Y>>::Output: Quantity,
{
    debug_assert_eq!(xs.len(), ys.len());

    enum BracketType<X, Y> {
        Bracket((X, Y), (X, Y)),
        EndEqual((X, Y)),
    }

    let make_bracket = |pnt_0: (X, Y), pnt_1: (X, Y)| -> Option<BracketType<X, Y>> {
        let (x0, _) = pnt_0;
        let (x1, _) = pnt_1;

        if (x0 < target_x && x1 > target_x) || (x0 > target_x && x1 < target_x) {
            Some(BracketType::Bracket(pnt_0, pnt_1))
        } else if (x0 - target_x).unpack().abs() < std::f64::EPSILON {
            Some(BracketType::EndEqual(pnt_0))
        } else if (x1 - target_x).unpack().abs() < std::f64::EPSILON {
            Some(BracketType::EndEqual(pnt_1))
        } else {
            None
        }
    };

    let known: Vec<(X, Y)> = izip!(xs, ys)
        .filter_map(|(x, y)| y.into_option().map(|y| (*x, y)))
        .collect();

    if known.len() < 2 {
        return Optioned::default();
    }

    let value = known
        .iter()
        .cloned()
        // Look at them in pairs.
        .tuple_windows::<(_, _)>()
        // Get the first (and only) pair that brackets the target value
        .find_map(|(pnt_0, pnt_1)| make_bracket(pnt_0, pnt_1))
        .map(|val| match val {
            BracketType::Bracket((x0, y0), (x1, y1)) => linear_interp(target_x, x0, x1, y0, y1),
            BracketType::EndEqual(pnt) => pnt.1,
        })
        .unwrap_or_else(|| {
            // Outside the known points, continue the end segment on the target's side.
            let (first, second) = (known[0], known[1]);
            let before_start = (target_x - first.0).unpack() * (second.0 - first.0).unpack() < 0.0;

            let ((x0, y0), (x1, y1)) = if before_start {
                (first, second)
            } else {
                (known[known.len() - 2], known[known.len() - 1])
            };
            linear_interp(target_x, x0, x1, y0, y1)
        });

    optional::some(value)
}

#[inline]
pub(crate) fn linear_interp<X, Y>(x_val: X, x1: X, x2: X, y1: Y, y2: Y) -> Y
where
    X: Sub<X> + Copy + std::fmt::Debug + std::cmp::PartialEq,
    <X as Sub<X>>::Output: Quantity,
    Y: Quantity + Sub<Y>,
    <Y as Sub<Y>>::Output: Quantity,
{
    debug_assert_ne!(x1, x2);

    let run = (x2 - x1).unpack();
    let rise = (y2 - y1).unpack();
    let dx = (x_val - x1).unpack();

    Y::pack(y1.unpack() + dx * (rise / run))
}
