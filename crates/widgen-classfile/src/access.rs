/// Raw `access_flags` of a class, nested-class entry, or method.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct AccessFlags(pub u16);

impl AccessFlags {
    pub const PUBLIC: u16 = 0x0001;
    pub const PRIVATE: u16 = 0x0002;
    pub const PROTECTED: u16 = 0x0004;
    pub const STATIC: u16 = 0x0008;
    pub const FINAL: u16 = 0x0010;
    /// `ACC_BRIDGE` on methods (shares its bit with `ACC_VOLATILE` on fields).
    pub const BRIDGE: u16 = 0x0040;
    pub const INTERFACE: u16 = 0x0200;
    pub const ABSTRACT: u16 = 0x0400;
    pub const SYNTHETIC: u16 = 0x1000;

    #[must_use]
    pub fn contains(self, flag: u16) -> bool {
        self.0 & flag != 0
    }

    #[must_use]
    pub fn is_public(self) -> bool {
        self.contains(Self::PUBLIC)
    }

    #[must_use]
    pub fn is_static(self) -> bool {
        self.contains(Self::STATIC)
    }

    #[must_use]
    pub fn is_abstract(self) -> bool {
        self.contains(Self::ABSTRACT)
    }

    #[must_use]
    pub fn is_interface(self) -> bool {
        self.contains(Self::INTERFACE)
    }

    #[must_use]
    pub fn is_bridge(self) -> bool {
        self.contains(Self::BRIDGE)
    }

    #[must_use]
    pub fn is_synthetic(self) -> bool {
        self.contains(Self::SYNTHETIC)
    }
}

impl From<u16> for AccessFlags {
    fn from(value: u16) -> Self {
        Self(value)
    }
}
