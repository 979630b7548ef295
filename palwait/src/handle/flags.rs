use bitflags::bitflags;

bitflags! {
    /// Interest and result state of one descriptor slot.
    ///
    /// `READ` and `WRITE` are set by the owner of the handle. `WRITABLE` and
    /// `ERROR` are set by the wait path and are never cleared by it.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct SlotFlags: u8 {
        /// Notify when the slot becomes readable.
        const READ = 0b0001;
        /// Notify when the slot becomes writable.
        const WRITE = 0b0010;
        /// The slot was observed writable.
        const WRITABLE = 0b0100;
        /// The slot reported an error, hang-up or end of stream.
        const ERROR = 0b1000;

        /// Both interest bits.
        const INTEREST = Self::READ.bits() | Self::WRITE.bits();
        /// Both result bits.
        const RESULTS = Self::WRITABLE.bits() | Self::ERROR.bits();
    }
}

impl SlotFlags {
    /// Whether the owner asked for any notification on this slot.
    pub fn has_interest(self) -> bool {
        self.intersects(SlotFlags::INTEREST)
    }

    /// Read interest that has not already been answered by an error.
    pub(crate) fn armed_read(self) -> bool {
        self.contains(SlotFlags::READ) && !self.contains(SlotFlags::ERROR)
    }

    /// Write interest that has not already been answered.
    pub(crate) fn armed_write(self) -> bool {
        self.contains(SlotFlags::WRITE) && !self.intersects(SlotFlags::RESULTS)
    }
}
