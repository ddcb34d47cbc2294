use super::InnoGen;

/// One directed, weighted edge of a genome. Genes of two genomes sharing an innovation id are
/// homologous, whatever their current weight or enabled state.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionGene {
    inno: usize,
    from: usize,
    to: usize,
    pub weight: f64,
    pub enabled: bool,
}

impl ConnectionGene {
    pub fn new(inno: usize, from: usize, to: usize, weight: f64, enabled: bool) -> Self {
        Self {
            inno,
            from,
            to,
            weight,
            enabled,
        }
    }

    /// An enabled connection between `from` and `to`, whose innovation id is minted by `inno`
    pub fn minted(from: usize, to: usize, weight: f64, inno: &mut InnoGen) -> Self {
        Self::new(inno.path((from, to)), from, to, weight, true)
    }

    /// gene innovation id
    #[inline]
    pub fn inno(&self) -> usize {
        self.inno
    }

    #[inline]
    pub fn from(&self) -> usize {
        self.from
    }

    #[inline]
    pub fn to(&self) -> usize {
        self.to
    }

    #[inline]
    pub fn path(&self) -> (usize, usize) {
        (self.from, self.to)
    }

    #[inline]
    pub fn weight(&self) -> f64 {
        self.weight
    }

    #[inline]
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn enable(&mut self) {
        self.enabled = true;
    }

    pub fn disable(&mut self) {
        self.enabled = false;
    }

    pub fn toggle(&mut self) {
        self.enabled = !self.enabled;
    }

    /// difference of weights between this and a homologous connection
    pub fn param_diff(&self, other: &Self) -> f64 {
        (self.weight - other.weight).abs()
    }

    /// Disable this connection, returning the two connections that replace it through the
    /// internal node `center`
    pub fn bisect(&mut self, center: usize, inno: &mut InnoGen) -> (Self, Self) {
        self.disable();
        (
            // from -{1.}> bisect-node
            Self::minted(self.from, center, 1., inno),
            // bisect-node -{w}> to
            Self::minted(center, self.to, self.weight, inno),
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_bisect() {
        let mut inno = InnoGen::new(1);
        let mut c = ConnectionGene::new(0, 0, 1, 2., true);
        let (l, r) = c.bisect(2, &mut inno);

        assert!(!c.enabled());
        assert_eq!(l.path(), (0, 2));
        assert_eq!(l.weight(), 1.);
        assert!(l.enabled());
        assert_eq!(r.path(), (2, 1));
        assert_eq!(r.weight(), 2.);
        assert!(r.enabled());
        assert_eq!((l.inno(), r.inno()), (1, 2));
    }

    #[test]
    fn test_param_diff() {
        let l = ConnectionGene::new(0, 0, 1, 0.5, true);
        let r = ConnectionGene::new(0, 0, 1, -0.25, false);
        assert_eq!(l.param_diff(&r), 0.75);
        assert_eq!(r.param_diff(&l), 0.75);
    }
}
