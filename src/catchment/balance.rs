/// Final output size per bin, in `same, up, down, side` order.
///
/// If every bin reached its target the targets are returned. Otherwise each
/// bin is cut to what it actually holds and, when `fill` is set, the
/// shortfall is handed out one slot at a time, round-robin over the bins, to
/// bins that hold more candidates than they currently output.
pub fn balance(targets: [usize; 4], observed: [usize; 4], fill: bool) -> [usize; 4] {
    if targets.iter().zip(&observed).all(|(t, o)| o >= t) {
        return targets;
    }

    let mut sizes = [0; 4];
    for (size, (&target, &held)) in sizes.iter_mut().zip(targets.iter().zip(&observed)) {
        *size = target.min(held);
    }
    if !fill {
        return sizes;
    }

    let mut shortfall = targets.iter().sum::<usize>() - sizes.iter().sum::<usize>();
    while shortfall > 0 {
        let mut progressed = false;
        for (size, &held) in sizes.iter_mut().zip(&observed) {
            if shortfall == 0 {
                break;
            }
            if *size < held {
                *size += 1;
                shortfall -= 1;
                progressed = true;
            }
        }
        if !progressed {
            break;
        }
    }
    sizes
}
