/// A derived value with an explicit dependency key.
///
/// The value is recomputed only when the key of its inputs differs from the key it
/// was last computed with.
#[derive(Debug)]
pub struct Derived<K, V> {
    inputs: Option<K>,
    value: V,
    recomputes: u64,
}

impl<K: PartialEq, V> Derived<K, V> {
    pub fn new(initial: V) -> Self {
        Self {
            inputs: None,
            value: initial,
            recomputes: 0,
        }
    }

    /// Returns true when `compute` ran.
    pub fn refresh(&mut self, inputs: K, compute: impl FnOnce() -> V) -> bool {
        if self.inputs.as_ref() == Some(&inputs) {
            return false;
        }
        self.value = compute();
        self.inputs = Some(inputs);
        self.recomputes += 1;
        true
    }

    pub fn get(&self) -> &V {
        &self.value
    }

    pub fn recomputes(&self) -> u64 {
        self.recomputes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recomputes_only_on_key_change() {
        let mut d: Derived<(u64, u64), u64> = Derived::new(0);
        assert!(d.refresh((1, 1), || 10));
        assert!(!d.refresh((1, 1), || 99));
        assert_eq!(*d.get(), 10);
        assert!(d.refresh((1, 2), || 20));
        assert_eq!(*d.get(), 20);
        assert_eq!(d.recomputes(), 2);
    }
}
