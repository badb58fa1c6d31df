mod provider_dto;

pub use provider_dto::{
    RegisterUtilityProviderDto, UpdateProviderStatusDto, UtilityProviderResponseDto,
};
